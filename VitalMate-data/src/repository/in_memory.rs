use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::errors::RepositoryError;
use crate::models::vital::VitalRecord;

/// In-memory storage implementation for vital readings
///
/// Used as the fallback when the database pool is unavailable and as
/// the backing store in tests.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Storage for vital readings keyed by id
    readings: Arc<Mutex<HashMap<String, VitalRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            readings: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a reading in memory
    pub async fn store_reading(&self, record: &VitalRecord) -> Result<VitalRecord, RepositoryError> {
        let mut store = self.readings.lock()?;
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Get all readings from memory, newest first
    pub async fn get_all(&self) -> Result<Vec<VitalRecord>, RepositoryError> {
        let store = self.readings.lock()?;
        let mut readings: Vec<VitalRecord> = store.values().cloned().collect();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(readings)
    }

    /// Get a reading by ID from memory
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<VitalRecord>, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(store.get(&id.to_string()).cloned())
    }

    /// Replace an existing reading
    pub async fn update_reading(&self, record: &VitalRecord) -> Result<VitalRecord, RepositoryError> {
        let mut store = self.readings.lock()?;
        if !store.contains_key(&record.id) {
            return Err(RepositoryError::NotFound(record.id.clone()));
        }
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Delete a reading by ID
    pub async fn delete_reading(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock()?;
        store
            .remove(&id.to_string())
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Get filtered readings from memory
    pub async fn get_filtered(
        &self,
        vital_type: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalRecord>, usize), RepositoryError> {
        let store = self.readings.lock()?;
        let sort_desc = sort_desc.unwrap_or(true);

        // First collect and filter all readings
        let mut readings: Vec<VitalRecord> = store
            .values()
            .filter(|&record| {
                if let Some(vital_type) = vital_type {
                    if record.vital_type != vital_type {
                        return false;
                    }
                }

                if let Some(start_date) = start_date {
                    if record.recorded_at.as_str() < start_date {
                        return false;
                    }
                }

                if let Some(end_date) = end_date {
                    if record.recorded_at.as_str() > end_date {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        // Sort by recorded_at
        readings.sort_by(|a, b| {
            let cmp = a.recorded_at.cmp(&b.recorded_at);
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        // Apply pagination
        let total = readings.len();
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(total);

        let page = readings.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }
}
