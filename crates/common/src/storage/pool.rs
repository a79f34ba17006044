//! SQLite connection pool
//!
//! r2d2-based pooling for a single on-disk SQLite database. Each connection
//! gets the configured pragmas applied when it is opened.

use std::path::{Path, PathBuf};
use std::time::Instant;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};

/// A pooled connection; derefs to [`rusqlite::Connection`] and returns to the
/// pool when dropped.
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// SQLite connection pool
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
    path: PathBuf,
}

impl SqlitePool {
    /// Open (creating if needed) the database at `path` and build the pool.
    ///
    /// A test connection is acquired up front so a bad path or unreadable
    /// file fails here rather than on first use.
    #[instrument(skip(config), fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        if config.max_size == 0 {
            return Err(StorageError::InvalidConfig("pool size must be at least 1".into()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pragma_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pragma_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        {
            let conn = pool.get().map_err(|e| {
                StorageError::Connection(format!("Failed to get test connection: {}", e))
            })?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
        }

        info!("SQLite pool created with {} connections", config.max_size);

        Ok(Self { pool, config, path: path.to_path_buf() })
    }

    /// Acquire a connection from the pool
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!("Connection acquired in {}ms", start.elapsed().as_millis());
                Ok(conn)
            }
            Err(e) => {
                if e.to_string().to_lowercase().contains("timed out") {
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {}", e)))
                }
            }
        }
    }

    /// Path of the database file backing this pool
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured maximum number of connections
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn creates_pool_and_executes_queries() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = SqlitePool::new(&db_path, SqlitePoolConfig::default()).unwrap();
        let conn = pool.get_connection().unwrap();
        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY)", []).unwrap();

        assert_eq!(pool.path(), db_path.as_path());
        assert_eq!(pool.max_size(), 4);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("test.db");

        SqlitePool::new(&db_path, SqlitePoolConfig::default()).unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn rejects_zero_sized_pool() {
        let temp_dir = TempDir::new().unwrap();
        let config = SqlitePoolConfig { max_size: 0, ..SqlitePoolConfig::default() };

        let result = SqlitePool::new(&temp_dir.path().join("test.db"), config);
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }

    #[test]
    fn concurrent_connections_share_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = Arc::new(SqlitePool::new(&db_path, SqlitePoolConfig::default()).unwrap());

        pool.get_connection()
            .unwrap()
            .execute("CREATE TABLE test (id INTEGER PRIMARY KEY, value TEXT)", [])
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    let conn = pool.get_connection().unwrap();
                    conn.execute("INSERT INTO test (value) VALUES (?1)", [format!("thread_{i}")])
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let count: i32 = pool
            .get_connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM test", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }
}
