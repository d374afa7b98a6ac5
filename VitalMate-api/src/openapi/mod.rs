use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vital sign endpoints
        crate::api::handlers::vitals::get_vital,
        crate::api::handlers::vitals::create_vital,
        crate::api::handlers::vitals::update_vital,
        crate::api::handlers::vitals::delete_vital,
        crate::api::handlers::vitals::get_vitals_history,
        crate::api::handlers::vitals::get_vitals_summary,
    ),
    components(
        schemas(
            // Entities
            crate::entities::vital::VitalReading,
            crate::entities::vital::CreateVitalRequest,
            crate::entities::vital::UpdateVitalRequest,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Vital handlers
            crate::api::handlers::vitals::ErrorResponse,
            crate::api::handlers::vitals::VitalPaginatedResponse,
            crate::api::handlers::vitals::HistoryQueryParams,
            crate::api::handlers::vitals::SummaryQueryParams,

            // Domain schemas
            vital_mate_domain::entities::vital::VitalType,
            vital_mate_domain::entities::vital::VitalValue,
            vital_mate_domain::entities::vital::Severity,
            vital_mate_domain::entities::vital::TimeOfDay,
            vital_mate_domain::entities::vital::Trend,
            vital_mate_domain::entities::vital::VitalAverage,
            vital_mate_domain::entities::vital::TypeSummary,
            vital_mate_domain::entities::vital::VitalSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vitals", description = "Vital sign tracking endpoints")
    ),
    info(
        title = "VitalMate API",
        version = "0.1.0",
        description = "API for recording vital sign readings, classifying them against normal ranges, and summarising trends",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "VitalMate API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "health"));
        assert!(tags.iter().any(|tag| tag.name == "vitals"));

        // Verify paths are defined for our endpoints
        assert!(openapi.paths.paths.contains_key("/health"));
        assert!(openapi.paths.paths.contains_key("/api/v1/vitals"));
        assert!(openapi.paths.paths.contains_key("/api/v1/vitals/{id}"));
        assert!(openapi.paths.paths.contains_key("/api/v1/vitals/summary"));
    }
}
