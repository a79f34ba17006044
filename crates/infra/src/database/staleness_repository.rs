//! SQLite-backed implementation of the `RecordRepository` port.
//!
//! Entries are stored as a JSON array next to the refresh timestamp (epoch
//! milliseconds). Each save replaces the whole row for its cache key.

use std::sync::Arc;

use async_trait::async_trait;
use campuscal_core::RecordRepository;
use campuscal_domain::{CacheKey, CalendarEntry, CampusCalError, Result as DomainResult, StalenessRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_sql_error, DbManager};
use crate::errors::{json_error, JsonContext};

/// SQLite repository for staleness records.
pub struct SqliteRecordRepository {
    db: Arc<DbManager>,
}

impl SqliteRecordRepository {
    /// Create a repository backed by the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordRepository for SqliteRecordRepository {
    #[instrument(skip(self), fields(cache_key = %key))]
    async fn load(&self, key: &CacheKey) -> DomainResult<Option<StalenessRecord>> {
        let db = Arc::clone(&self.db);
        let key = key.clone();
        task::spawn_blocking(move || -> DomainResult<Option<StalenessRecord>> {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(SELECT_RECORD_SQL, params![key.as_str()], StoredRow::from_row)
                .optional()
                .map_err(map_sql_error)?;

            row.map(|row| row.into_record(key)).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, record), fields(cache_key = %record.cache_key, entries = record.entries.len()))]
    async fn save(&self, record: &StalenessRecord) -> DomainResult<()> {
        let entries_json =
            serde_json::to_string(&record.entries).map_err(|e| json_error(&e, JsonContext::StoredRecord))?;
        let db = Arc::clone(&self.db);
        let cache_key = record.cache_key.as_str().to_string();
        let source_url = record.source_url.clone();
        let last_refresh_ms = record.last_refresh.timestamp_millis();
        let format_version = record.format_version;

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                UPSERT_RECORD_SQL,
                params![
                    cache_key,
                    source_url,
                    last_refresh_ms,
                    entries_json,
                    format_version,
                    Utc::now().timestamp_millis()
                ],
            )
            .map_err(map_sql_error)?;
            debug!("Record saved");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn delete(&self, key: &CacheKey) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let key = key.as_str().to_string();
        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let removed = conn.execute(DELETE_RECORD_SQL, params![key]).map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

const SELECT_RECORD_SQL: &str = "SELECT source_url, last_refresh_ms, entries_json, format_version
    FROM staleness_records
    WHERE cache_key = ?1";

const UPSERT_RECORD_SQL: &str = "INSERT INTO staleness_records (
        cache_key, source_url, last_refresh_ms, entries_json, format_version, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(cache_key) DO UPDATE SET
        source_url = excluded.source_url,
        last_refresh_ms = excluded.last_refresh_ms,
        entries_json = excluded.entries_json,
        format_version = excluded.format_version,
        updated_at = excluded.updated_at";

const DELETE_RECORD_SQL: &str = "DELETE FROM staleness_records WHERE cache_key = ?1";

struct StoredRow {
    source_url: String,
    last_refresh_ms: i64,
    entries_json: String,
    format_version: u32,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            source_url: row.get(0)?,
            last_refresh_ms: row.get(1)?,
            entries_json: row.get(2)?,
            format_version: row.get(3)?,
        })
    }

    fn into_record(self, cache_key: CacheKey) -> DomainResult<StalenessRecord> {
        let last_refresh = DateTime::<Utc>::from_timestamp_millis(self.last_refresh_ms).ok_or_else(|| {
            CampusCalError::Storage(format!("stored refresh time {} is out of range", self.last_refresh_ms))
        })?;
        let entries: Vec<CalendarEntry> = serde_json::from_str(&self.entries_json)
            .map_err(|e| json_error(&e, JsonContext::StoredRecord))?;

        Ok(StalenessRecord {
            cache_key,
            source_url: self.source_url,
            last_refresh,
            entries,
            format_version: self.format_version,
        })
    }
}

fn map_join_error(err: task::JoinError) -> CampusCalError {
    CampusCalError::Internal(format!("database task failed: {err}"))
}
