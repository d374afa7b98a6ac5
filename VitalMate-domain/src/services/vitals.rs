use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::entities::conversions;
use crate::entities::vital::{
    CreateVitalRequest, TypeSummary, UpdateVitalRequest, VitalReading, VitalSummary, VitalType,
    VitalValue,
};
use crate::services::classifier;
use vital_mate_data::repository::{RepositoryError, VitalRepositoryTrait};

/// Vital service errors
#[derive(Debug, Error)]
pub enum VitalServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Reading not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for vital service operations
#[async_trait]
pub trait VitalServiceTrait {
    /// Validate a create vital request
    fn validate_create_request(&self, request: &CreateVitalRequest) -> Result<(), VitalServiceError>;

    /// Build the per-type summary for readings inside a lookback window.
    /// Readings must be sorted most-recent-first; types with no
    /// readings are omitted.
    fn calculate_summary(&self, readings: &[VitalReading], period_days: u32) -> VitalSummary;

    /// Create a new vital reading; classification happens here and any
    /// caller-supplied status is ignored
    async fn create_reading(&self, request: CreateVitalRequest) -> Result<VitalReading, VitalServiceError>;

    /// Get all vital readings, newest first
    async fn get_all_readings(&self) -> Result<Vec<VitalReading>, VitalServiceError>;

    /// Get a vital reading by ID
    async fn get_reading_by_id(&self, id: &str) -> Result<VitalReading, VitalServiceError>;

    /// Get filtered vital readings
    async fn get_filtered_readings(
        &self,
        vital_type: Option<VitalType>,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalReading>, usize), VitalServiceError>;

    /// Update an existing vital reading, reclassifying when the type or
    /// value changed
    async fn update_reading(
        &self,
        id: &str,
        request: UpdateVitalRequest,
    ) -> Result<VitalReading, VitalServiceError>;

    /// Delete a vital reading
    async fn delete_reading(&self, id: &str) -> Result<(), VitalServiceError>;
}

/// Vital service for domain logic
pub struct VitalService<R: VitalRepositoryTrait> {
    repository: R,
}

impl<R: VitalRepositoryTrait> VitalService<R> {
    /// Create a new vital service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> VitalServiceError {
        match err {
            RepositoryError::NotFound(msg) => VitalServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => VitalServiceError::ValidationError(msg),
            _ => VitalServiceError::RepositoryError(err.to_string()),
        }
    }
}

/// Check that a measurement value has the shape the vital type expects
/// and that its numbers are usable
fn validate_value_shape(vital_type: VitalType, value: &VitalValue) -> Result<(), VitalServiceError> {
    match (vital_type, value) {
        (VitalType::BloodPressure, VitalValue::BloodPressure { systolic, diastolic, .. }) => {
            if !systolic.is_finite() || !diastolic.is_finite() || *systolic < 0.0 || *diastolic < 0.0 {
                return Err(VitalServiceError::ValidationError(
                    "Blood pressure values must be finite and non-negative".to_string(),
                ));
            }
            if systolic <= diastolic {
                return Err(VitalServiceError::ValidationError(
                    "Systolic pressure must be greater than diastolic pressure".to_string(),
                ));
            }
            Ok(())
        }
        (VitalType::BloodPressure, VitalValue::Scalar { .. }) => Err(VitalServiceError::ValidationError(
            "Blood pressure readings require systolic and diastolic values".to_string(),
        )),
        (_, VitalValue::BloodPressure { .. }) => Err(VitalServiceError::ValidationError(format!(
            "{} readings require a single reading value",
            vital_type
        ))),
        (_, VitalValue::Scalar { reading, .. }) => {
            if !reading.is_finite() || *reading < 0.0 {
                return Err(VitalServiceError::ValidationError(
                    "Reading must be finite and non-negative".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Flatten validator crate errors into one message
fn format_validation_errors(validation_errors: validator::ValidationErrors) -> String {
    validation_errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

#[async_trait]
impl<R: VitalRepositoryTrait + Send + Sync> VitalServiceTrait for VitalService<R> {
    /// Validate a create vital request
    fn validate_create_request(&self, request: &CreateVitalRequest) -> Result<(), VitalServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(VitalServiceError::ValidationError(format_validation_errors(
                validation_errors,
            )));
        }

        validate_value_shape(request.vital_type, &request.value)
    }

    /// Build the per-type summary for readings inside a lookback window
    fn calculate_summary(&self, readings: &[VitalReading], period_days: u32) -> VitalSummary {
        let mut vitals = BTreeMap::new();

        for vital_type in VitalType::ALL {
            let type_readings: Vec<VitalReading> = readings
                .iter()
                .filter(|r| r.vital_type == vital_type)
                .cloned()
                .collect();

            if type_readings.is_empty() {
                continue;
            }

            // Non-empty, so the average cannot fail
            let average = match classifier::average(&type_readings, vital_type) {
                Ok(average) => average,
                Err(_) => continue,
            };

            let summary = TypeSummary {
                count: type_readings.len(),
                latest: type_readings[0].clone(),
                average,
                trend: classifier::trend(&type_readings, vital_type),
                abnormal_count: type_readings.iter().filter(|r| !r.is_normal).count(),
            };

            vitals.insert(vital_type, summary);
        }

        VitalSummary {
            period_days,
            vitals,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Create a new vital reading
    async fn create_reading(&self, request: CreateVitalRequest) -> Result<VitalReading, VitalServiceError> {
        self.validate_create_request(&request)?;

        let recorded_at = request
            .recorded_at
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let time_of_day = request.time_of_day.unwrap_or_default();

        // Classification is computed here; whatever the caller thinks
        // the status is never reaches storage
        let status = classifier::classify(request.vital_type, &request.value);
        debug!(
            "Classified {} reading as {:?}",
            request.vital_type, status.severity
        );

        let record = conversions::convert_to_data_new_record(
            request.vital_type,
            &request.value,
            recorded_at,
            time_of_day,
            request.notes,
            status,
        );

        let stored = self
            .repository
            .create(record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_reading(stored).map_err(VitalServiceError::RepositoryError)
    }

    /// Get all vital readings
    async fn get_all_readings(&self) -> Result<Vec<VitalReading>, VitalServiceError> {
        let records = self
            .repository
            .get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        records
            .into_iter()
            .map(|r| conversions::convert_to_domain_reading(r).map_err(VitalServiceError::RepositoryError))
            .collect()
    }

    /// Get a vital reading by ID
    async fn get_reading_by_id(&self, id: &str) -> Result<VitalReading, VitalServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id).map_err(VitalServiceError::ValidationError)?;

        let record = self
            .repository
            .get_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| VitalServiceError::NotFound(format!("Vital reading with ID {} not found", id)))?;

        conversions::convert_to_domain_reading(record).map_err(VitalServiceError::RepositoryError)
    }

    /// Get filtered vital readings
    async fn get_filtered_readings(
        &self,
        vital_type: Option<VitalType>,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalReading>, usize), VitalServiceError> {
        let (records, total_count) = self
            .repository
            .get_filtered(
                vital_type.map(|t| t.as_str().to_string()),
                start_date,
                end_date,
                limit,
                offset,
                sort_desc,
            )
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let readings = records
            .into_iter()
            .map(|r| conversions::convert_to_domain_reading(r).map_err(VitalServiceError::RepositoryError))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((readings, total_count))
    }

    /// Update an existing vital reading
    async fn update_reading(
        &self,
        id: &str,
        request: UpdateVitalRequest,
    ) -> Result<VitalReading, VitalServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(VitalServiceError::ValidationError(format_validation_errors(
                validation_errors,
            )));
        }

        let mut reading = self.get_reading_by_id(id).await?;

        let reclassify = request.vital_type.is_some() || request.value.is_some();

        if let Some(vital_type) = request.vital_type {
            reading.vital_type = vital_type;
        }
        if let Some(value) = request.value {
            reading.value = value;
        }
        if let Some(recorded_at) = request.recorded_at {
            reading.recorded_at = recorded_at;
        }
        if let Some(time_of_day) = request.time_of_day {
            reading.time_of_day = time_of_day;
        }
        if let Some(notes) = request.notes {
            reading.notes = Some(notes);
        }

        validate_value_shape(reading.vital_type, &reading.value)?;

        // Status must track the (type, value) pair; recompute before
        // the record is persisted
        if reclassify {
            let status = classifier::classify(reading.vital_type, &reading.value);
            reading.is_normal = status.is_normal;
            reading.severity = status.severity;
        }

        let record = conversions::convert_to_data_record(&reading);
        let stored = self
            .repository
            .update(record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_reading(stored).map_err(VitalServiceError::RepositoryError)
    }

    /// Delete a vital reading
    async fn delete_reading(&self, id: &str) -> Result<(), VitalServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id).map_err(VitalServiceError::ValidationError)?;

        self.repository
            .delete(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))
    }
}

/// Create a default vital service using the repository from the data layer
pub fn create_default_vital_service() -> impl VitalServiceTrait + Send + Sync {
    let repository = vital_mate_data::repository::VitalRepository::new();
    VitalService::new(repository)
}

/// Create a mock vital service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_vital_service() -> impl VitalServiceTrait + Send + Sync {
    crate::testing::MockVitalService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vital::{Severity, TimeOfDay, VitalAverage};
    use vital_mate_data::repository::tests::MockVitalRepository;

    fn service() -> VitalService<MockVitalRepository> {
        VitalService::new(MockVitalRepository::new())
    }

    fn bp_request(systolic: f64, diastolic: f64) -> CreateVitalRequest {
        CreateVitalRequest {
            vital_type: VitalType::BloodPressure,
            value: VitalValue::BloodPressure {
                systolic,
                diastolic,
                unit: Some("mmHg".to_string()),
            },
            recorded_at: Some(Utc::now().to_rfc3339()),
            time_of_day: Some(TimeOfDay::Morning),
            notes: None,
        }
    }

    fn scalar_request(vital_type: VitalType, reading: f64) -> CreateVitalRequest {
        CreateVitalRequest {
            vital_type,
            value: VitalValue::Scalar {
                reading,
                unit: None,
            },
            recorded_at: Some(Utc::now().to_rfc3339()),
            time_of_day: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_create_request_valid() {
        assert!(service().validate_create_request(&bp_request(120.0, 80.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_systolic_not_above_diastolic() {
        let result = service().validate_create_request(&bp_request(80.0, 80.0));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than"));
    }

    #[test]
    fn test_validate_rejects_scalar_value_for_blood_pressure() {
        let request = CreateVitalRequest {
            vital_type: VitalType::BloodPressure,
            value: VitalValue::Scalar {
                reading: 120.0,
                unit: None,
            },
            recorded_at: None,
            time_of_day: None,
            notes: None,
        };
        let result = service().validate_create_request(&request);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("systolic"));
    }

    #[test]
    fn test_validate_rejects_oversized_notes() {
        let mut request = scalar_request(VitalType::Weight, 70.0);
        request.notes = Some("x".repeat(1001));
        let result = service().validate_create_request(&request);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("1000"));
    }

    #[tokio::test]
    async fn test_create_reading_classifies() {
        let created = service()
            .create_reading(scalar_request(VitalType::BloodSugar, 250.0))
            .await
            .unwrap();

        assert!(!created.is_normal);
        assert_eq!(created.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_create_reading_defaults_time_of_day() {
        let mut request = scalar_request(VitalType::HeartRate, 72.0);
        request.recorded_at = None;
        request.time_of_day = None;

        let created = service().create_reading(request).await.unwrap();
        assert_eq!(created.time_of_day, TimeOfDay::Morning);
        assert!(created.is_normal);
        assert!(!created.recorded_at.is_empty());
    }

    #[tokio::test]
    async fn test_update_reading_reclassifies_on_value_change() {
        let svc = service();
        let created = svc
            .create_reading(scalar_request(VitalType::HeartRate, 72.0))
            .await
            .unwrap();
        assert!(created.is_normal);

        let updated = svc
            .update_reading(
                &created.id,
                UpdateVitalRequest {
                    vital_type: None,
                    value: Some(VitalValue::Scalar {
                        reading: 130.0,
                        unit: None,
                    }),
                    recorded_at: None,
                    time_of_day: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_normal);
        assert_eq!(updated.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_update_without_value_keeps_status() {
        let svc = service();
        let created = svc
            .create_reading(scalar_request(VitalType::BloodSugar, 150.0))
            .await
            .unwrap();
        assert_eq!(created.severity, Severity::High);

        let updated = svc
            .update_reading(
                &created.id,
                UpdateVitalRequest {
                    vital_type: None,
                    value: None,
                    recorded_at: None,
                    time_of_day: Some(TimeOfDay::Night),
                    notes: Some("after dinner".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.severity, Severity::High);
        assert_eq!(updated.time_of_day, TimeOfDay::Night);
        assert_eq!(updated.notes.as_deref(), Some("after dinner"));
    }

    #[tokio::test]
    async fn test_get_reading_by_id_not_found() {
        let result = service()
            .get_reading_by_id("123e4567-e89b-12d3-a456-426614174000")
            .await;
        assert!(matches!(result, Err(VitalServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_reading_not_found() {
        let result = service()
            .delete_reading("123e4567-e89b-12d3-a456-426614174000")
            .await;
        assert!(matches!(result, Err(VitalServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_calculate_summary_groups_by_type() {
        let svc = service();

        for (reading, when) in [(110.0, "2024-03-01T08:00:00Z"), (250.0, "2024-03-02T08:00:00Z")] {
            let mut request = scalar_request(VitalType::BloodSugar, reading);
            request.recorded_at = Some(when.to_string());
            svc.create_reading(request).await.unwrap();
        }
        let mut hr = scalar_request(VitalType::HeartRate, 72.0);
        hr.recorded_at = Some("2024-03-02T09:00:00Z".to_string());
        svc.create_reading(hr).await.unwrap();

        let (readings, _) = svc
            .get_filtered_readings(None, None, None, None, None, Some(true))
            .await
            .unwrap();
        let summary = svc.calculate_summary(&readings, 30);

        assert_eq!(summary.period_days, 30);
        assert_eq!(summary.vitals.len(), 2);

        let sugar = summary.vitals.get(&VitalType::BloodSugar).unwrap();
        assert_eq!(sugar.count, 2);
        assert_eq!(sugar.abnormal_count, 1);
        assert_eq!(sugar.latest.value.reading(), Some(250.0));
        assert_eq!(sugar.average, VitalAverage::Scalar(180.0));

        // Types with no readings in the window are omitted entirely
        assert!(!summary.vitals.contains_key(&VitalType::Weight));
    }
}
