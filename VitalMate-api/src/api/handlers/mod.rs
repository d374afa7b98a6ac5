pub mod health;
pub mod vitals;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use vitals::{
    create_vital, delete_vital, get_vital, get_vitals_history, get_vitals_summary, update_vital,
};
