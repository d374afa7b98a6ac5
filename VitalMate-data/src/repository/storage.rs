use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::vital::VitalRecord;

/// Database storage operations for vital readings
pub struct DatabaseStorage;

const COLUMNS: &str = "id, vital_type, systolic, diastolic, reading, unit, recorded_at, \
                       time_of_day, notes, is_normal, severity, created_at, updated_at";

#[cfg(feature = "sqlite")]
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<VitalRecord> {
    Ok(VitalRecord {
        id: row.get(0)?,
        vital_type: row.get(1)?,
        systolic: row.get(2)?,
        diastolic: row.get(3)?,
        reading: row.get(4)?,
        unit: row.get(5)?,
        recorded_at: row.get(6)?,
        time_of_day: row.get(7)?,
        notes: row.get(8)?,
        is_normal: row.get(9)?,
        severity: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

#[cfg(feature = "sqlite")]
impl DatabaseStorage {
    /// Store a reading in the database
    pub async fn store_reading(pool: &DatabasePool, record: &VitalRecord) -> Result<(), RepositoryError> {
        debug!("Storing vital reading in database: id={}", record.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get().map_err(RepositoryError::Pool)?;

                conn.execute(
                    "INSERT INTO vital_readings
                     (id, vital_type, systolic, diastolic, reading, unit, recorded_at,
                      time_of_day, notes, is_normal, severity, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    rusqlite::params![
                        &record.id,
                        &record.vital_type,
                        record.systolic,
                        record.diastolic,
                        record.reading,
                        &record.unit,
                        &record.recorded_at,
                        &record.time_of_day,
                        &record.notes,
                        record.is_normal,
                        &record.severity,
                        &record.created_at,
                        &record.updated_at,
                    ],
                )
                .map_err(RepositoryError::Sqlite)?;

                Ok(())
            }
        }
    }

    /// Get all readings from the database, newest first
    pub async fn get_all(pool: &DatabasePool) -> Result<Vec<VitalRecord>, RepositoryError> {
        debug!("Getting all vital readings from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM vital_readings ORDER BY recorded_at DESC",
                    COLUMNS
                ))?;

                let readings = stmt.query_map([], row_to_record)?;

                let mut result = Vec::new();
                for reading in readings {
                    result.push(reading?);
                }

                Ok(result)
            }
        }
    }

    /// Get a reading by ID from the database
    pub async fn get_by_id(pool: &DatabasePool, id: &Uuid) -> Result<Option<VitalRecord>, RepositoryError> {
        debug!("Getting vital reading by ID from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM vital_readings WHERE id = ?",
                    COLUMNS
                ))?;

                let reading = stmt.query_row([&id.to_string()], row_to_record);

                match reading {
                    Ok(reading) => Ok(Some(reading)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            }
        }
    }

    /// Replace an existing reading; errors when the id does not exist
    pub async fn update_reading(pool: &DatabasePool, record: &VitalRecord) -> Result<(), RepositoryError> {
        debug!("Updating vital reading in database: id={}", record.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let changed = conn.execute(
                    "UPDATE vital_readings SET
                        vital_type = ?2, systolic = ?3, diastolic = ?4, reading = ?5,
                        unit = ?6, recorded_at = ?7, time_of_day = ?8, notes = ?9,
                        is_normal = ?10, severity = ?11, updated_at = ?12
                     WHERE id = ?1",
                    rusqlite::params![
                        &record.id,
                        &record.vital_type,
                        record.systolic,
                        record.diastolic,
                        record.reading,
                        &record.unit,
                        &record.recorded_at,
                        &record.time_of_day,
                        &record.notes,
                        record.is_normal,
                        &record.severity,
                        &record.updated_at,
                    ],
                )?;

                if changed == 0 {
                    return Err(RepositoryError::NotFound(record.id.clone()));
                }

                Ok(())
            }
        }
    }

    /// Delete a reading by ID; errors when the id does not exist
    pub async fn delete_reading(pool: &DatabasePool, id: &Uuid) -> Result<(), RepositoryError> {
        debug!("Deleting vital reading from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let changed = conn.execute(
                    "DELETE FROM vital_readings WHERE id = ?",
                    [&id.to_string()],
                )?;

                if changed == 0 {
                    return Err(RepositoryError::NotFound(id.to_string()));
                }

                Ok(())
            }
        }
    }

    /// Get filtered readings from the database
    pub async fn get_filtered(
        pool: &DatabasePool,
        vital_type: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalRecord>, usize), RepositoryError> {
        debug!("Getting filtered vital readings from database");

        let sort_direction = if sort_desc.unwrap_or(true) { "DESC" } else { "ASC" };
        // LIMIT -1 means unbounded in SQLite
        let limit_val = limit.map(|l| l as i64).unwrap_or(-1);
        let offset_val = offset.unwrap_or(0);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut query = format!("SELECT {} FROM vital_readings", COLUMNS);

                let mut where_clauses = Vec::new();
                let mut params: Vec<&dyn rusqlite::ToSql> = Vec::new();

                // Owned copies so the parameter references live long enough
                let type_string: Option<String> = vital_type.map(|s| s.to_string());
                let start_string: Option<String> = start_date.map(|s| s.to_string());
                let end_string: Option<String> = end_date.map(|s| s.to_string());

                if let Some(ref vital_type) = type_string {
                    where_clauses.push("vital_type = ?");
                    params.push(vital_type as &dyn rusqlite::ToSql);
                }

                if let Some(ref start) = start_string {
                    where_clauses.push("recorded_at >= ?");
                    params.push(start as &dyn rusqlite::ToSql);
                }

                if let Some(ref end) = end_string {
                    where_clauses.push("recorded_at <= ?");
                    params.push(end as &dyn rusqlite::ToSql);
                }

                if !where_clauses.is_empty() {
                    query.push_str(" WHERE ");
                    query.push_str(&where_clauses.join(" AND "));
                }

                query.push_str(&format!(" ORDER BY recorded_at {}", sort_direction));
                query.push_str(&format!(" LIMIT {} OFFSET {}", limit_val, offset_val));

                let mut stmt = conn.prepare(&query)?;

                let readings = stmt.query_map(rusqlite::params_from_iter(params.iter()), row_to_record)?;

                let mut result = Vec::new();
                for reading in readings {
                    result.push(reading?);
                }

                // Get total count for pagination
                let mut count_query = String::from("SELECT COUNT(*) FROM vital_readings");

                if !where_clauses.is_empty() {
                    count_query.push_str(" WHERE ");
                    count_query.push_str(&where_clauses.join(" AND "));
                }

                let mut count_stmt = conn.prepare(&count_query)?;
                let total: i64 =
                    count_stmt.query_row(rusqlite::params_from_iter(params.iter()), |row| row.get(0))?;

                Ok((result, total as usize))
            }
        }
    }
}
