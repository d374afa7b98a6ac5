//! Database connection module for the VitalMate application
//!
//! Provides a process-wide SQLite connection pool. The pool is created
//! once at startup; repositories fall back to in-memory storage when it
//! was never initialized (tests, missing data directory).

use std::env;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{error, info};

use super::DatabaseError;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Database connection pool
///
/// Kept as an enum so additional backends can slot in without touching
/// call sites.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    #[cfg(feature = "sqlite")]
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub sqlite_path: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "./data/vitalmate.db".to_string(),
            pool_size: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let sqlite_path = env::var("DB_SQLITE_PATH")
            .unwrap_or_else(|_| Self::default().sqlite_path);

        let pool_size = env::var("DB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!(
            "Database configuration: path={}, pool_size={}, timeout={}s",
            sqlite_path, pool_size, timeout_seconds
        );

        Self {
            sqlite_path,
            pool_size,
            timeout_seconds,
        }
    }
}

/// Initialize the global database pool from environment configuration
///
/// Safe to call more than once; later calls are no-ops. Returns an
/// error when the pool cannot be built, in which case repositories run
/// against in-memory storage.
#[cfg(feature = "sqlite")]
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        info!("Database pool already initialized");
        return Ok(());
    }

    let config = DatabaseConfig::from_env();
    let pool = create_sqlite_pool(&config)?;

    // Run migrations on a fresh connection before publishing the pool
    {
        let conn = pool
            .get()
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        super::migrations::run_sqlite_migrations(&conn)
            .map_err(DatabaseError::MigrationError)?;
    }

    DB_POOL
        .set(DatabasePool::SQLite(Arc::new(pool)))
        .map_err(|_| DatabaseError::GenericError("Database pool is already initialized".to_string()))?;

    info!("SQLite database pool initialized at {}", config.sqlite_path);
    Ok(())
}

/// Build an SQLite connection pool for the given configuration
#[cfg(feature = "sqlite")]
fn create_sqlite_pool(
    config: &DatabaseConfig,
) -> Result<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>, DatabaseError> {
    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path);

    r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create SQLite connection pool: {}", e);
            DatabaseError::ConnectionError(e.to_string())
        })
}

/// Get the global database pool
///
/// Errors when the pool was never initialized; callers treat that as
/// "database unavailable" and fall back to in-memory storage.
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL
        .get()
        .cloned()
        .ok_or_else(|| DatabaseError::ConnectionError("Database pool is not initialized".to_string()))
}

/// Human-readable description of the active database connection
///
/// Returns None when no pool has been initialized.
pub fn get_connection_info() -> Option<String> {
    match DB_POOL.get() {
        #[cfg(feature = "sqlite")]
        Some(DatabasePool::SQLite(pool)) => {
            let state = pool.state();
            Some(format!(
                "sqlite: healthy ({} connections, {} idle)",
                state.connections, state.idle_connections
            ))
        }
        #[cfg(not(feature = "sqlite"))]
        Some(_) => None,
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path, "./data/vitalmate.db");
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_pool_not_initialized_error() {
        // The pool is process-global; this only asserts the error shape
        // when nothing has initialized it yet.
        if DB_POOL.get().is_none() {
            let err = get_db_pool().unwrap_err();
            assert!(err.to_string().contains("not initialized"));
        }
    }
}
