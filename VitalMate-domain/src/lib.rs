// VitalMate Domain
// This crate contains the business logic for the VitalMate application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from vital-mate-data for convenience
pub use vital_mate_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
