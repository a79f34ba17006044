//! Database connection manager backed by the shared SQLite pool.

use std::path::Path;
use std::sync::Arc;

use campuscal_common::storage::{SqliteConnection, SqlitePool, SqlitePoolConfig};
use campuscal_domain::{CampusCalError, DatabaseConfig, Result};
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

pub(crate) const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
#[derive(Debug)]
pub struct DbManager {
    pool: Arc<SqlitePool>,
}

impl DbManager {
    /// Open the database at `db_path` with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref();
        let config = SqlitePoolConfig { max_size: pool_size, ..SqlitePoolConfig::default() };

        let pool = SqlitePool::new(path, config).map_err(|e| CampusCalError::from(InfraError::from(e)))?;

        info!(db_path = %path.display(), max_connections = pool.max_size(), "sqlite pool initialised");

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open the configured database and bring its schema up to date.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let manager = Self::new(&config.path, config.pool_size)?;
        manager.run_migrations()?;
        Ok(manager)
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(|e| CampusCalError::from(InfraError::from(e)))
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        self.pool.path()
    }

    /// Verify the database is accessible and responding.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> CampusCalError {
    CampusCalError::from(InfraError::from(err))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn migrations_create_schema_version() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 2).expect("manager created");
        manager.run_migrations().expect("migrations run");

        let conn = manager.get_connection().expect("connection acquired");
        let version: i32 =
            conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0)).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 2).expect("manager created");

        manager.run_migrations().expect("first run");
        manager.run_migrations().expect("second run");

        let conn = manager.get_connection().unwrap();
        let rows: i32 = conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn open_applies_schema() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let config = DatabaseConfig {
            path: temp_dir.path().join("nested").join("cal.db").to_string_lossy().into_owned(),
            pool_size: 2,
        };

        let manager = DbManager::open(&config).expect("database opened");
        manager.health_check().expect("health check passed");

        let conn = manager.get_connection().unwrap();
        let tables: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'staleness_records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn zero_pool_size_is_config_error() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let result = DbManager::new(temp_dir.path().join("test.db"), 0);
        assert!(matches!(result, Err(CampusCalError::Config(_))));
    }
}
