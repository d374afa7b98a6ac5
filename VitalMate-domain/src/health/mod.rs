//! System health reporting for VitalMate.
//!
//! The database is probed through the data layer; the aggregation into
//! an overall status lives here so every surface reports health the
//! same way.

use async_trait::async_trait;
use std::collections::HashMap;
use vital_mate_data::database;

/// Overall system status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Status of a single component
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// One monitored component with optional detail text
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system with per-component breakdown
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the vital readings store.
    /// Ok(true) means fully operational, Ok(false) means degraded, Err
    /// means unavailable.
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Probe the vital readings store through the active connection pool
pub async fn check_database_status() -> Result<bool, String> {
    if let Some(info) = database::get_connection_info() {
        return Ok(info.contains("healthy"));
    }

    // No connection info means the pool was never initialized or the
    // backend does not report state
    database::get_db_pool()
        .map(|_| true)
        .map_err(|e| format!("Database connection error: {}", e))
}

/// Build the full system health report: the vital readings store plus
/// the always-on API component
pub async fn get_system_health() -> SystemHealth {
    let mut components = HashMap::new();

    let database = match check_database_status().await {
        Ok(true) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: database::get_connection_info(),
        },
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Vital readings store is reachable but degraded".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    };
    components.insert("database".to_string(), database);

    components.insert(
        "api".to_string(),
        HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
    );

    SystemHealth {
        status: overall_status(&components),
        components,
    }
}

/// The worst component status wins
fn overall_status(components: &HashMap<String, HealthComponent>) -> SystemStatus {
    if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
        SystemStatus::Unhealthy
    } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    }
}
