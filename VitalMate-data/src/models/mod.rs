// Data storage models
// These structs mirror the database schema and stay stringly typed;
// the domain layer owns the richer enum representations.

pub mod vital;
