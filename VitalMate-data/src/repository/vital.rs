use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;
use crate::database::get_db_pool;
use crate::models::vital::{NewVitalRecord, VitalRecord};

/// Repository trait for vital readings
#[async_trait]
pub trait VitalRepositoryTrait {
    /// Create a new vital reading; the repository assigns the id and
    /// bookkeeping timestamps
    async fn create(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError>;

    /// Get all vital readings, newest first
    async fn get_all(&self) -> Result<Vec<VitalRecord>, RepositoryError>;

    /// Get a vital reading by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalRecord>, RepositoryError>;

    /// Replace an existing vital reading
    async fn update(&self, record: VitalRecord) -> Result<VitalRecord, RepositoryError>;

    /// Delete a vital reading by ID
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Get filtered vital readings with a total count for pagination
    async fn get_filtered(
        &self,
        vital_type: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalRecord>, usize), RepositoryError>;
}

/// Repository for vital readings.
/// Uses the SQLite pool when available and falls back to in-memory
/// storage otherwise.
#[derive(Debug, Clone, Default)]
pub struct VitalRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryStorage,
}

impl VitalRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

fn build_record(id: Uuid, record: NewVitalRecord) -> VitalRecord {
    let now = Utc::now().to_rfc3339();
    VitalRecord {
        id: id.to_string(),
        vital_type: record.vital_type,
        systolic: record.systolic,
        diastolic: record.diastolic,
        reading: record.reading,
        unit: record.unit,
        recorded_at: record.recorded_at,
        time_of_day: record.time_of_day,
        notes: record.notes,
        is_normal: record.is_normal,
        severity: record.severity,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[async_trait]
impl VitalRepositoryTrait for VitalRepository {
    /// Create a new vital reading
    async fn create(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
        let record = build_record(Uuid::new_v4(), record);

        // Try to store in database first
        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing vital reading in database: {}", record.id);
                match DatabaseStorage::store_reading(&pool, &record).await {
                    Ok(_) => Ok(record),
                    Err(e) => {
                        error!("Failed to store reading in database: {}", e);
                        // Fall back to in-memory storage
                        self.storage.store_reading(&record).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_reading(&record).await
            }
        }
    }

    /// Get all vital readings
    async fn get_all(&self) -> Result<Vec<VitalRecord>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting all vital readings from database");
                match DatabaseStorage::get_all(&pool).await {
                    Ok(readings) => Ok(readings),
                    Err(e) => {
                        error!("Failed to get readings from database: {}", e);
                        self.storage.get_all().await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all", e);
                self.storage.get_all().await
            }
        }
    }

    /// Get a vital reading by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalRecord>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting vital reading by ID from database: {}", id);
                match DatabaseStorage::get_by_id(&pool, &id).await {
                    Ok(reading) => Ok(reading),
                    Err(e) => {
                        error!("Failed to get reading by ID from database: {}", e);
                        self.storage.get_by_id(&id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_by_id", e);
                self.storage.get_by_id(&id).await
            }
        }
    }

    /// Replace an existing vital reading
    async fn update(&self, mut record: VitalRecord) -> Result<VitalRecord, RepositoryError> {
        record.updated_at = Utc::now().to_rfc3339();

        match get_db_pool() {
            Ok(pool) => {
                debug!("Updating vital reading in database: {}", record.id);
                match DatabaseStorage::update_reading(&pool, &record).await {
                    Ok(_) => Ok(record),
                    Err(RepositoryError::NotFound(id)) => Err(RepositoryError::NotFound(id)),
                    Err(e) => {
                        error!("Failed to update reading in database: {}", e);
                        self.storage.update_reading(&record).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for update", e);
                self.storage.update_reading(&record).await
            }
        }
    }

    /// Delete a vital reading by ID
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Deleting vital reading from database: {}", id);
                match DatabaseStorage::delete_reading(&pool, &id).await {
                    Ok(()) => Ok(()),
                    Err(RepositoryError::NotFound(id)) => Err(RepositoryError::NotFound(id)),
                    Err(e) => {
                        error!("Failed to delete reading from database: {}", e);
                        self.storage.delete_reading(&id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for delete", e);
                self.storage.delete_reading(&id).await
            }
        }
    }

    /// Get filtered vital readings
    async fn get_filtered(
        &self,
        vital_type: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalRecord>, usize), RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting filtered vital readings from database");
                match DatabaseStorage::get_filtered(
                    &pool,
                    vital_type.as_deref(),
                    start_date.as_deref(),
                    end_date.as_deref(),
                    limit,
                    offset,
                    sort_desc,
                )
                .await
                {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        error!("Failed to get filtered readings from database: {}", e);
                        self.storage
                            .get_filtered(
                                vital_type.as_deref(),
                                start_date.as_deref(),
                                end_date.as_deref(),
                                limit,
                                offset,
                                sort_desc,
                            )
                            .await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_filtered", e);
                self.storage
                    .get_filtered(
                        vital_type.as_deref(),
                        start_date.as_deref(),
                        end_date.as_deref(),
                        limit,
                        offset,
                        sort_desc,
                    )
                    .await
            }
        }
    }
}

/// Mock vital repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Mock implementation of VitalRepository for testing
    pub struct MockVitalRepository {
        readings: Mutex<Vec<VitalRecord>>,
    }

    impl Default for MockVitalRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockVitalRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self {
                readings: Mutex::new(Vec::new()),
            }
        }

        /// Create a mock repository with predefined readings
        pub fn with_readings(readings: Vec<VitalRecord>) -> Self {
            Self {
                readings: Mutex::new(readings),
            }
        }
    }

    #[async_trait]
    impl VitalRepositoryTrait for MockVitalRepository {
        async fn create(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
            let record = build_record(Uuid::new_v4(), record);
            self.readings.lock()?.push(record.clone());
            Ok(record)
        }

        async fn get_all(&self) -> Result<Vec<VitalRecord>, RepositoryError> {
            let mut readings = self.readings.lock()?.clone();
            readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
            Ok(readings)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalRecord>, RepositoryError> {
            let readings = self.readings.lock()?;
            Ok(readings.iter().find(|r| r.id == id.to_string()).cloned())
        }

        async fn update(&self, record: VitalRecord) -> Result<VitalRecord, RepositoryError> {
            let mut readings = self.readings.lock()?;
            match readings.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => {
                    *existing = record.clone();
                    Ok(record)
                }
                None => Err(RepositoryError::NotFound(record.id)),
            }
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            let mut readings = self.readings.lock()?;
            let before = readings.len();
            readings.retain(|r| r.id != id.to_string());
            if readings.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        }

        async fn get_filtered(
            &self,
            vital_type: Option<String>,
            start_date: Option<String>,
            end_date: Option<String>,
            limit: Option<usize>,
            offset: Option<usize>,
            sort_desc: Option<bool>,
        ) -> Result<(Vec<VitalRecord>, usize), RepositoryError> {
            let offset = offset.unwrap_or(0);
            let limit = limit.unwrap_or(usize::MAX);
            let sort_desc = sort_desc.unwrap_or(true);

            let mut filtered: Vec<VitalRecord> = self
                .readings
                .lock()?
                .iter()
                .filter(|record| {
                    if let Some(vital_type) = &vital_type {
                        if &record.vital_type != vital_type {
                            return false;
                        }
                    }

                    if let Some(start) = &start_date {
                        if record.recorded_at < *start {
                            return false;
                        }
                    }

                    if let Some(end) = &end_date {
                        if record.recorded_at > *end {
                            return false;
                        }
                    }

                    true
                })
                .cloned()
                .collect();

            filtered.sort_by(|a, b| {
                let cmp = a.recorded_at.cmp(&b.recorded_at);
                if sort_desc {
                    cmp.reverse()
                } else {
                    cmp
                }
            });

            let total = filtered.len();

            let paged = filtered.into_iter().skip(offset).take(limit).collect();

            Ok((paged, total))
        }
    }

    // Only compiled into test builds; the mock itself stays available
    // to downstream crates through the `mock` feature.
    #[cfg(test)]
    #[tokio::test]
    async fn test_mock_create_assigns_id_and_timestamps() {
        let repo = MockVitalRepository::new();
        let created = repo
            .create(NewVitalRecord {
                vital_type: "blood_sugar".to_string(),
                systolic: None,
                diastolic: None,
                reading: Some(110.0),
                unit: Some("mg/dL".to_string()),
                recorded_at: "2024-03-01T08:00:00Z".to_string(),
                time_of_day: "morning".to_string(),
                notes: None,
                is_normal: true,
                severity: "normal".to_string(),
            })
            .await
            .unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert!(!created.created_at.is_empty());
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo
            .get_by_id(Uuid::parse_str(&created.id).unwrap())
            .await
            .unwrap();
        assert!(fetched.is_some());
    }

    #[cfg(test)]
    #[tokio::test]
    async fn test_mock_update_missing_is_not_found() {
        let repo = MockVitalRepository::new();
        let record = build_record(
            Uuid::new_v4(),
            NewVitalRecord {
                vital_type: "weight".to_string(),
                systolic: None,
                diastolic: None,
                reading: Some(70.0),
                unit: Some("kg".to_string()),
                recorded_at: "2024-03-01T08:00:00Z".to_string(),
                time_of_day: "morning".to_string(),
                notes: None,
                is_normal: true,
                severity: "normal".to_string(),
            },
        );

        let result = repo.update(record).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
