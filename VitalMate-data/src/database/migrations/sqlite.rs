use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_vital_readings_table(conn)?;
    create_vital_readings_indexes(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the vital readings table
fn create_vital_readings_table(conn: &Connection) -> Result<(), String> {
    info!("Creating vital_readings table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vital_readings (
            id TEXT PRIMARY KEY,
            vital_type TEXT NOT NULL,
            systolic REAL,
            diastolic REAL,
            reading REAL,
            unit TEXT,
            recorded_at TEXT NOT NULL,
            time_of_day TEXT NOT NULL,
            notes TEXT,
            is_normal INTEGER NOT NULL,
            severity TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create indexes for history and per-type summary queries
fn create_vital_readings_indexes(conn: &Connection) -> Result<(), String> {
    info!("Creating vital_readings indexes");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_vital_readings_recorded_at
        ON vital_readings (recorded_at DESC)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_vital_readings_type_recorded_at
        ON vital_readings (vital_type, recorded_at DESC)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
