// Domain entities and value objects
pub mod conversions;
pub mod vital;

// Re-export common types for easier imports
pub use vital::{
    CreateVitalRequest, Severity, TimeOfDay, Trend, TypeSummary, UpdateVitalRequest, VitalAverage,
    VitalReading, VitalStatus, VitalSummary, VitalType, VitalValue,
};
