use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Import domain entities and services
use vital_mate_domain::entities::vital::VitalReading as DomainVitalReading;
use vital_mate_domain::entities::VitalType;
use vital_mate_domain::services::{create_default_vital_service, VitalServiceTrait};

// Import our entities
use crate::entities::vital::{CreateVitalRequest, UpdateVitalRequest, VitalReading};

/// Query parameters for retrieving vital reading history
#[derive(Debug, Deserialize, Clone, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// Filter by vital type (e.g. blood_pressure, heart_rate)
    #[serde(rename = "type")]
    pub vital_type: Option<String>,

    /// ISO 8601 start date; omit for no lower bound
    pub start_date: Option<String>,

    /// ISO 8601 end date; omit for no upper bound
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

/// Query parameters for the vitals summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SummaryQueryParams {
    /// Lookback period in days (default: 30, max: 365)
    pub days: Option<u32>,
}

/// Paginated response for vital reading data
#[derive(Serialize, ToSchema)]
#[aliases(VitalPaginatedResponse = PaginatedResponse<VitalReading>)]
pub struct PaginatedResponse<T> {
    /// Total count of items available
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// URL for the next page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Actual data items
    pub data: Vec<T>,
}

/// Error response format for API
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Service type for dependency injection
pub type VitalService = Arc<dyn VitalServiceTrait + Send + Sync>;

/// Create a default service for the handlers to use
pub fn create_service() -> VitalService {
    Arc::new(create_default_vital_service())
}

/// Get a single vital reading by ID
#[utoipa::path(
    get,
    path = "/api/v1/vitals/{id}",
    params(
        ("id" = String, Path, description = "Vital reading ID")
    ),
    responses(
        (status = 200, description = "Vital reading found", body = VitalReading),
        (status = 404, description = "Vital reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_vital(
    State(service): State<VitalService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching vital reading with ID: {}", id);

    match service.get_reading_by_id(&id.to_string()).await {
        Ok(reading) => {
            let public_reading = convert_to_public_reading(reading).map_err(conversion_failure)?;
            Ok((StatusCode::OK, Json(public_reading)))
        }
        Err(e) => {
            let error_message = e.to_string();
            if error_message.contains("not found") {
                info!("Vital reading not found: {}", id);
                Err((StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("vital reading"))).into_response())
            } else {
                error!("Error retrieving vital reading: {}", error_message);
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response())
            }
        }
    }
}

/// Create a new vital reading
#[utoipa::path(
    post,
    path = "/api/v1/vitals",
    request_body = CreateVitalRequest,
    responses(
        (status = 201, description = "Vital reading created", body = VitalReading),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service, request))]
pub async fn create_vital(
    State(service): State<VitalService>,
    Json(request): Json<CreateVitalRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Creating new vital reading");

    let domain_request = convert_to_domain_request(request);

    match service.create_reading(domain_request).await {
        Ok(reading) => {
            info!("Vital reading created with ID: {}", reading.id);
            let public_reading = convert_to_public_reading(reading).map_err(conversion_failure)?;
            Ok((StatusCode::CREATED, Json(public_reading)))
        }
        Err(e) => {
            let error_message = e.to_string();
            if error_message.contains("Validation") {
                warn!("Invalid vital reading data: {}", error_message);
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::validation_error(&error_message, None)),
                )
                    .into_response())
            } else {
                error!("Error creating vital reading: {}", error_message);
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response())
            }
        }
    }
}

/// Update an existing vital reading
#[utoipa::path(
    put,
    path = "/api/v1/vitals/{id}",
    params(
        ("id" = String, Path, description = "Vital reading ID")
    ),
    request_body = UpdateVitalRequest,
    responses(
        (status = 200, description = "Vital reading updated", body = VitalReading),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Vital reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service, request))]
pub async fn update_vital(
    State(service): State<VitalService>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVitalRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Updating vital reading with ID: {}", id);

    let domain_request = convert_to_domain_update(request);

    match service.update_reading(&id.to_string(), domain_request).await {
        Ok(reading) => {
            let public_reading = convert_to_public_reading(reading).map_err(conversion_failure)?;
            Ok((StatusCode::OK, Json(public_reading)))
        }
        Err(e) => {
            let error_message = e.to_string();
            if error_message.contains("not found") {
                info!("Vital reading not found: {}", id);
                Err((StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("vital reading"))).into_response())
            } else if error_message.contains("Validation") {
                warn!("Invalid vital reading update: {}", error_message);
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::validation_error(&error_message, None)),
                )
                    .into_response())
            } else {
                error!("Error updating vital reading: {}", error_message);
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response())
            }
        }
    }
}

/// Delete a vital reading
#[utoipa::path(
    delete,
    path = "/api/v1/vitals/{id}",
    params(
        ("id" = String, Path, description = "Vital reading ID")
    ),
    responses(
        (status = 204, description = "Vital reading deleted"),
        (status = 404, description = "Vital reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn delete_vital(
    State(service): State<VitalService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    info!("Deleting vital reading with ID: {}", id);

    match service.delete_reading(&id.to_string()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            let error_message = e.to_string();
            if error_message.contains("not found") {
                info!("Vital reading not found: {}", id);
                Err((StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("vital reading"))).into_response())
            } else {
                error!("Error deleting vital reading: {}", error_message);
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response())
            }
        }
    }
}

/// Generate pagination links from the current request
fn generate_pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    query_params: &HistoryQueryParams,
) -> (Option<String>, Option<String>) {
    let has_next = offset + limit < total_count;
    let has_prev = offset > 0;

    let build_query = |params: &HistoryQueryParams| {
        let mut query_parts = Vec::new();

        if let Some(vital_type) = &params.vital_type {
            query_parts.push(format!("type={}", vital_type));
        }

        if let Some(start) = &params.start_date {
            query_parts.push(format!("start_date={}", start));
        }

        if let Some(end) = &params.end_date {
            query_parts.push(format!("end_date={}", end));
        }

        if let Some(limit) = params.limit {
            query_parts.push(format!("limit={}", limit));
        }

        if let Some(offset) = params.offset {
            query_parts.push(format!("offset={}", offset));
        }

        if let Some(sort) = &params.sort {
            query_parts.push(format!("sort={}", sort));
        }

        if query_parts.is_empty() {
            String::new()
        } else {
            format!("?{}", query_parts.join("&"))
        }
    };

    let next = if has_next {
        let mut next_params = query_params.clone();
        next_params.offset = Some(offset + limit);
        next_params.limit = Some(limit);
        Some(format!("{}{}", base_url, build_query(&next_params)))
    } else {
        None
    };

    let previous = if has_prev {
        let mut prev_params = query_params.clone();
        prev_params.offset = Some(offset.saturating_sub(limit));
        prev_params.limit = Some(limit);
        Some(format!("{}{}", base_url, build_query(&prev_params)))
    } else {
        None
    };

    (next, previous)
}

/// Get paginated vital reading history
#[utoipa::path(
    get,
    path = "/api/v1/vitals",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "Vital history retrieved", body = VitalPaginatedResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_vitals_history(
    State(service): State<VitalService>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<impl IntoResponse, Response> {
    // Process query parameters
    let limit = params.limit.unwrap_or(100).min(1000); // Cap at 1000
    let offset = params.offset.unwrap_or(0);

    // Default to sorting by most recent if not specified
    let sort_desc = !matches!(params.sort.as_deref(), Some("asc"));

    let vital_type = match &params.vital_type {
        Some(raw) => match raw.parse::<VitalType>() {
            Ok(vital_type) => Some(vital_type),
            Err(_) => {
                let error = ErrorResponse::bad_request(&format!("Unknown vital type: {}", raw));
                return Err((StatusCode::BAD_REQUEST, Json(error)).into_response());
            }
        },
        None => None,
    };

    // Date bounds are only applied when the caller supplies them; an
    // unbounded request returns the full paginated history
    let start_date_str = match &params.start_date {
        Some(date_str) => match chrono::DateTime::parse_from_rfc3339(date_str) {
            Ok(date) => Some(date.with_timezone(&Utc).to_rfc3339()),
            Err(_) => {
                let error = ErrorResponse::bad_request(
                    "Invalid start_date format. Use ISO 8601 (e.g. 2023-03-15T08:30:00Z)",
                );
                return Err((StatusCode::BAD_REQUEST, Json(error)).into_response());
            }
        },
        None => None,
    };

    let end_date_str = match &params.end_date {
        Some(date_str) => match chrono::DateTime::parse_from_rfc3339(date_str) {
            Ok(date) => Some(date.with_timezone(&Utc).to_rfc3339()),
            Err(_) => {
                let error = ErrorResponse::bad_request(
                    "Invalid end_date format. Use ISO 8601 (e.g. 2023-03-15T08:30:00Z)",
                );
                return Err((StatusCode::BAD_REQUEST, Json(error)).into_response());
            }
        },
        None => None,
    };

    match service
        .get_filtered_readings(
            vital_type,
            start_date_str,
            end_date_str,
            Some(limit),
            Some(offset),
            Some(sort_desc),
        )
        .await
    {
        Ok((domain_readings, total_count)) => {
            let base_url = "/api/v1/vitals";

            let (next, previous) = generate_pagination_links(total_count, limit, offset, base_url, &params);

            let public_readings = domain_readings
                .into_iter()
                .map(convert_to_public_reading)
                .collect::<Result<Vec<_>, _>>()
                .map_err(conversion_failure)?;

            let response = PaginatedResponse {
                total_count,
                offset,
                limit,
                next,
                previous,
                data: public_readings,
            };

            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to get vital history: {}", e);
            let error = ErrorResponse::internal_error();
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response())
        }
    }
}

/// Get the per-type vitals summary for a lookback window
#[utoipa::path(
    get,
    path = "/api/v1/vitals/summary",
    params(
        SummaryQueryParams
    ),
    responses(
        (status = 200, description = "Vitals summary generated", body = vital_mate_domain::entities::VitalSummary),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_vitals_summary(
    State(service): State<VitalService>,
    Query(params): Query<SummaryQueryParams>,
) -> Result<impl IntoResponse, Response> {
    // Default to 30 days, max 1 year
    let days = params.days.unwrap_or(30).min(365);

    info!("Generating vitals summary for {} days", days);

    let now = Utc::now();
    let start_date = now - chrono::Duration::days(days as i64);
    let start_date_str = Some(start_date.to_rfc3339());
    let end_date_str = Some(now.to_rfc3339());

    match service
        .get_filtered_readings(None, start_date_str, end_date_str, None, None, Some(true))
        .await
    {
        Ok((domain_readings, _)) => {
            let summary = service.calculate_summary(&domain_readings, days);
            info!("Vitals summary generated for {} types", summary.vitals.len());
            Ok((StatusCode::OK, Json(summary)))
        }
        Err(e) => {
            error!("Failed to retrieve vital readings for summary: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response())
        }
    }
}

// Convert public request to domain request
fn convert_to_domain_request(
    request: CreateVitalRequest,
) -> vital_mate_domain::entities::vital::CreateVitalRequest {
    vital_mate_domain::entities::vital::CreateVitalRequest {
        vital_type: request.vital_type,
        value: request.value,
        recorded_at: request.recorded_at.map(|dt| dt.to_rfc3339()),
        time_of_day: request.time_of_day,
        notes: request.notes,
    }
}

// Convert public update request to domain request
fn convert_to_domain_update(
    request: UpdateVitalRequest,
) -> vital_mate_domain::entities::vital::UpdateVitalRequest {
    vital_mate_domain::entities::vital::UpdateVitalRequest {
        vital_type: request.vital_type,
        value: request.value,
        recorded_at: request.recorded_at.map(|dt| dt.to_rfc3339()),
        time_of_day: request.time_of_day,
        notes: request.notes,
    }
}

fn conversion_failure(message: String) -> Response {
    error!("Failed to convert stored reading: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal_error())).into_response()
}

// Convert domain reading to public reading; a stored id or timestamp
// that does not parse is a data error and is reported, not papered over
fn convert_to_public_reading(reading: DomainVitalReading) -> Result<VitalReading, String> {
    let id = Uuid::parse_str(&reading.id)
        .map_err(|e| format!("Invalid reading id '{}': {}", reading.id, e))?;

    let parse_timestamp = |raw: &str| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("Invalid timestamp '{}': {}", raw, e))
    };

    Ok(VitalReading {
        id,
        vital_type: reading.vital_type,
        value: reading.value,
        recorded_at: parse_timestamp(&reading.recorded_at)?,
        time_of_day: reading.time_of_day,
        notes: reading.notes,
        is_normal: reading.is_normal,
        severity: reading.severity,
        created_at: parse_timestamp(&reading.created_at)?,
        updated_at: parse_timestamp(&reading.updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vital_mate_domain::entities::vital::{Severity, TimeOfDay, VitalValue};

    fn sample_domain_reading(id: &str) -> DomainVitalReading {
        DomainVitalReading {
            id: id.to_string(),
            vital_type: VitalType::HeartRate,
            value: VitalValue::Scalar {
                reading: 72.0,
                unit: Some("bpm".to_string()),
            },
            recorded_at: "2024-03-01T08:00:00Z".to_string(),
            time_of_day: TimeOfDay::Morning,
            notes: None,
            is_normal: true,
            severity: Severity::Normal,
            created_at: "2024-03-01T08:00:00Z".to_string(),
            updated_at: "2024-03-01T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_public_conversion_keeps_stored_id() {
        let id = Uuid::new_v4();
        let converted = convert_to_public_reading(sample_domain_reading(&id.to_string())).unwrap();
        assert_eq!(converted.id, id);
        assert_eq!(converted.recorded_at.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn test_public_conversion_rejects_malformed_id() {
        let result = convert_to_public_reading(sample_domain_reading("not-a-uuid"));
        assert!(result.unwrap_err().contains("Invalid reading id"));
    }

    #[test]
    fn test_public_conversion_rejects_malformed_timestamp() {
        let mut reading = sample_domain_reading(&Uuid::new_v4().to_string());
        reading.recorded_at = "yesterday".to_string();
        let result = convert_to_public_reading(reading);
        assert!(result.unwrap_err().contains("Invalid timestamp"));
    }

    #[test]
    fn test_pagination_link_generation() {
        let query_params = HistoryQueryParams {
            vital_type: Some("heart_rate".to_string()),
            start_date: Some("2023-01-01T00:00:00Z".to_string()),
            end_date: Some("2023-02-01T00:00:00Z".to_string()),
            limit: Some(10),
            offset: Some(20),
            sort: Some("desc".to_string()),
        };

        // Test with more results available
        let (next, prev) = generate_pagination_links(50, 10, 20, "/api/v1/vitals", &query_params);

        assert!(next.is_some());
        assert!(prev.is_some());

        let next_url = next.unwrap();
        let prev_url = prev.unwrap();

        assert!(next_url.contains("offset=30"));
        assert!(next_url.contains("type=heart_rate"));
        assert!(prev_url.contains("offset=10"));

        // First page
        let (next, prev) = generate_pagination_links(50, 10, 0, "/api/v1/vitals", &query_params);
        assert!(next.is_some());
        assert!(prev.is_none()); // No previous page

        // Last page
        let (next, prev) = generate_pagination_links(50, 10, 40, "/api/v1/vitals", &query_params);
        assert!(next.is_none()); // No next page
        assert!(prev.is_some());
    }
}
