// Public entities for the VitalMate API
// This module contains data structures that are shared across the application boundary

// Re-export data structures for vital readings
pub mod vital;
