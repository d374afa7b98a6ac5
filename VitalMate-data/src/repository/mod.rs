// Repository module structure
pub mod errors;
mod in_memory;
mod storage;
mod vital;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use vital::{VitalRepository, VitalRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use vital::tests;
