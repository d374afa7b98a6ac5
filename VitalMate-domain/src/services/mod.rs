pub mod classifier;
pub mod vitals;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use vitals::{create_default_vital_service, VitalServiceTrait};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use vitals::create_mock_vital_service;
