use axum::{
    routing::get,
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{health, vitals};
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub async fn create_app() -> Router {
    debug!("Creating application router");

    // Create services using factory functions
    let vital_service = vitals::create_service();
    let health_service = health::create_health_service();

    // Set up API routes
    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/vitals/summary", get(vitals::get_vitals_summary))
        .route(
            "/vitals",
            get(vitals::get_vitals_history).post(vitals::create_vital),
        )
        .route(
            "/vitals/:id",
            get(vitals::get_vital)
                .put(vitals::update_vital)
                .delete(vitals::delete_vital),
        );

    debug!("API routes configured");

    // Set up public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(vital_service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    let swagger = configure_swagger_routes();

    app.merge(swagger)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Create a test application
    pub async fn create_test_app() -> Router {
        create_app().await
    }
}
