use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument};
use utoipa::ToSchema;
// Use the trait from domain layer
use vital_mate_domain::health;
use vital_mate_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthServiceTrait, SystemHealth, SystemStatus,
};

/// Enhanced health check response model with more system information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Database connection status
    pub database: ComponentHealthStatus,
    /// API status
    pub api: ComponentHealthStatus,
    /// Additional components (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

// Initialize the server start time
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = SERVER_START_TIME.set(start_time);
    });
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument]
pub async fn health_check(
    Extension(health_service): Extension<Arc<dyn HealthServiceTrait + Send + Sync>>,
) -> Result<impl IntoResponse, axum::response::Response> {
    info!("Health check requested");

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // Calculate uptime if server start time is available
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    // Map domain status to API status
    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let mut component_statuses = ComponentStatus {
        database: ComponentHealthStatus {
            status: map_component_status(
                &system_health
                    .components
                    .get("database")
                    .map(|c| c.status.clone())
                    .unwrap_or(DomainComponentStatus::Healthy),
            ),
            message: system_health.components.get("database").and_then(|c| c.details.clone()),
        },
        api: ComponentHealthStatus {
            status: map_component_status(
                &system_health
                    .components
                    .get("api")
                    .map(|c| c.status.clone())
                    .unwrap_or(DomainComponentStatus::Healthy),
            ),
            message: system_health.components.get("api").and_then(|c| c.details.clone()),
        },
        additional: None,
    };

    // Add any additional components as a JSON object
    if system_health.components.len() > 2 {
        let additional_components: serde_json::Value = system_health
            .components
            .iter()
            .filter(|(name, _)| name != &"database" && name != &"api")
            .map(|(name, component)| {
                (
                    name.clone(),
                    serde_json::json!({
                        "status": map_component_status(&component.status),
                        "message": component.details,
                    }),
                )
            })
            .collect::<serde_json::Map<String, serde_json::Value>>()
            .into();

        component_statuses.additional = Some(additional_components);
    }

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: component_statuses,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    // Return appropriate status code based on overall status
    match overall_status {
        "ok" => Ok((StatusCode::OK, Json(response))),
        "degraded" => Ok((StatusCode::SERVICE_UNAVAILABLE, Json(response))),
        _ => Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(response))),
    }
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

/// Implementation of the health service
#[derive(Debug)]
pub struct HealthService {}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthService {
    /// Create a new health service
    pub fn new() -> Self {
        HealthService {}
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    /// The domain layer owns the aggregation; this service only adapts
    /// it to the handler
    async fn get_system_health(&self) -> SystemHealth {
        health::get_system_health().await
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        health::check_database_status().await
    }
}

/// Factory function to create a health service
pub fn create_health_service() -> Arc<dyn HealthServiceTrait + Send + Sync> {
    Arc::new(HealthService::new())
}
