// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use vital_mate_data::repository::tests::MockVitalRepository;

use crate::entities::vital::{
    CreateVitalRequest, TypeSummary, UpdateVitalRequest, VitalReading, VitalSummary, VitalType,
};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::classifier;
use crate::services::vitals::{VitalServiceError, VitalServiceTrait};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// Mock implementation of the VitalServiceTrait for testing
pub struct MockVitalService {
    readings: RwLock<HashMap<String, VitalReading>>,
    should_fail_validation: bool,
    should_fail_creation: bool,
}

impl Default for MockVitalService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVitalService {
    /// Create a new mock vital service
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(HashMap::new()),
            should_fail_validation: false,
            should_fail_creation: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to fail creation
    pub fn with_creation_failure(mut self) -> Self {
        self.should_fail_creation = true;
        self
    }

    /// Add a pre-defined reading to the mock
    pub fn with_reading(self, reading: VitalReading) -> Self {
        {
            let mut readings = self.readings.write().unwrap();
            readings.insert(reading.id.clone(), reading);
        }
        self
    }

    /// Add multiple pre-defined readings to the mock
    pub fn with_readings(self, readings: Vec<VitalReading>) -> Self {
        {
            let mut readings_map = self.readings.write().unwrap();
            for reading in readings {
                readings_map.insert(reading.id.clone(), reading);
            }
        }
        self
    }
}

#[async_trait]
impl VitalServiceTrait for MockVitalService {
    fn validate_create_request(&self, _request: &CreateVitalRequest) -> Result<(), VitalServiceError> {
        if self.should_fail_validation {
            Err(VitalServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            Ok(())
        }
    }

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

            let average = match classifier::average(&type_readings, vital_type) {
                Ok(average) => average,
                Err(_) => continue,
            };

            vitals.insert(
                vital_type,
                TypeSummary {
                    count: type_readings.len(),
                    latest: type_readings[0].clone(),
                    average,
                    trend: classifier::trend(&type_readings, vital_type),
                    abnormal_count: type_readings.iter().filter(|r| !r.is_normal).count(),
                },
            );
        }

        VitalSummary {
            period_days,
            vitals,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    async fn create_reading(&self, request: CreateVitalRequest) -> Result<VitalReading, VitalServiceError> {
        self.validate_create_request(&request)?;

        if self.should_fail_creation {
            return Err(VitalServiceError::RepositoryError(
                "Repository error - mock is configured to fail creation".to_string(),
            ));
        }

        let status = classifier::classify(request.vital_type, &request.value);
        let now = chrono::Utc::now().to_rfc3339();
        let reading = VitalReading {
            id: uuid::Uuid::new_v4().to_string(),
            vital_type: request.vital_type,
            value: request.value,
            recorded_at: request.recorded_at.unwrap_or_else(|| now.clone()),
            time_of_day: request.time_of_day.unwrap_or_default(),
            notes: request.notes,
            is_normal: status.is_normal,
            severity: status.severity,
            created_at: now.clone(),
            updated_at: now,
        };

        let mut readings = self.readings.write().unwrap();
        readings.insert(reading.id.clone(), reading.clone());

        Ok(reading)
    }

    async fn get_all_readings(&self) -> Result<Vec<VitalReading>, VitalServiceError> {
        let readings = self.readings.read().unwrap();
        let mut readings_vec: Vec<VitalReading> = readings.values().cloned().collect();
        readings_vec.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(readings_vec)
    }

    async fn get_reading_by_id(&self, id: &str) -> Result<VitalReading, VitalServiceError> {
        let readings = self.readings.read().unwrap();

        match readings.get(id) {
            Some(reading) => Ok(reading.clone()),
            None => Err(VitalServiceError::NotFound(format!(
                "Vital reading with ID {} not found",
                id
            ))),
        }
    }

    async fn get_filtered_readings(
        &self,
        vital_type: Option<VitalType>,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalReading>, usize), VitalServiceError> {
        let readings = self.readings.read().unwrap();
        let mut readings_vec: Vec<VitalReading> = readings.values().cloned().collect();

        if let Some(vital_type) = vital_type {
            readings_vec.retain(|r| r.vital_type == vital_type);
        }

        if let Some(start) = &start_date {
            readings_vec.retain(|r| r.recorded_at >= *start);
        }

        if let Some(end) = &end_date {
            readings_vec.retain(|r| r.recorded_at <= *end);
        }

        readings_vec.sort_by(|a, b| {
            if sort_desc.unwrap_or(false) {
                b.recorded_at.cmp(&a.recorded_at)
            } else {
                a.recorded_at.cmp(&b.recorded_at)
            }
        });

        let total_count = readings_vec.len();

        if let Some(offset_val) = offset {
            if offset_val < readings_vec.len() {
                readings_vec = readings_vec.split_off(offset_val);
            } else {
                readings_vec = Vec::new();
            }
        }

        if let Some(limit_val) = limit {
            readings_vec.truncate(limit_val);
        }

        Ok((readings_vec, total_count))
    }

    async fn update_reading(
        &self,
        id: &str,
        request: UpdateVitalRequest,
    ) -> Result<VitalReading, VitalServiceError> {
        let mut readings = self.readings.write().unwrap();

        let reading = readings
            .get_mut(id)
            .ok_or_else(|| VitalServiceError::NotFound(format!("Vital reading with ID {} not found", id)))?;

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

        if reclassify {
            let status = classifier::classify(reading.vital_type, &reading.value);
            reading.is_normal = status.is_normal;
            reading.severity = status.severity;
        }
        reading.updated_at = chrono::Utc::now().to_rfc3339();

        Ok(reading.clone())
    }

    async fn delete_reading(&self, id: &str) -> Result<(), VitalServiceError> {
        let mut readings = self.readings.write().unwrap();

        match readings.remove(id) {
            Some(_) => Ok(()),
            None => Err(VitalServiceError::NotFound(format!(
                "Vital reading with ID {} not found",
                id
            ))),
        }
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Database component status
    database_status: ComponentStatus,
    /// System status
    system_status: SystemStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
            system_status: SystemStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with a degraded database
    pub fn with_degraded_database(mut self) -> Self {
        self.database_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with an unhealthy database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }

    /// Set the overall system status
    pub fn with_system_status(mut self, status: SystemStatus) -> Self {
        self.system_status = status;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    /// Get the system health
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "database".to_string(),
            HealthComponent {
                status: self.database_status.clone(),
                details: match self.database_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Database is experiencing high load".to_string()),
                    ComponentStatus::Unhealthy => Some("Database connection failed".to_string()),
                },
            },
        );

        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );

        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }

    /// Check database status
    async fn check_database_status(&self) -> Result<bool, String> {
        match self.database_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(true),
            ComponentStatus::Unhealthy => Err("Database connection failed".to_string()),
        }
    }
}

/// Factory function to create a mock vital service
pub fn create_mock_vital_service() -> impl VitalServiceTrait {
    MockVitalService::new()
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
