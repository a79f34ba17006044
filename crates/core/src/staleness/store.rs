//! Staleness store - decides when cached scrape results can be reused

use std::sync::Arc;

use campuscal_common::time::{Clock, SystemClock};
use campuscal_domain::{CacheKey, CalendarEntry, RescrapeDecision, StalenessRecord};
use chrono::{DateTime, SubsecRound, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::RecordRepository;

/// Tracks the last successful scrape per cache key.
///
/// Storage failures never reach the caller. A failed read is treated as "no
/// record"; a failed write keeps the record in a process-local overlay so the
/// current session can still use it.
pub struct StalenessStore {
    repository: Arc<dyn RecordRepository>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    write_locks: DashMap<CacheKey, Arc<Mutex<()>>>,
    overlay: DashMap<CacheKey, StalenessRecord>,
}

impl StalenessStore {
    /// Create a store backed by `repository`, using the system clock
    pub fn new(repository: Arc<dyn RecordRepository>, ttl: chrono::Duration) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            ttl,
            write_locks: DashMap::new(),
            overlay: DashMap::new(),
        }
    }

    /// Replace the clock used for refresh stamps and freshness checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Decide whether `key` must be scraped again from `source_url`.
    ///
    /// Stale when there is no readable record, the record was written in an
    /// unknown format, it was scraped from a different URL, or it is older
    /// than the TTL.
    #[instrument(skip(self), fields(cache_key = %key))]
    pub async fn should_rescrape(&self, source_url: &str, key: &CacheKey) -> RescrapeDecision {
        let Some(record) = self.current_record(key).await else {
            debug!("No record; rescrape required");
            return RescrapeDecision::rescrape();
        };

        if !record.is_current_format() {
            debug!(format_version = record.format_version, "Record format not recognised; ignoring");
            return RescrapeDecision::rescrape();
        }

        if record.source_url != source_url {
            debug!(stored_url = %record.source_url, "Source URL changed; rescrape required");
            return RescrapeDecision::rescrape();
        }

        let now = self.clock.now_utc();
        if record.is_fresh(now, self.ttl) {
            debug!(entries = record.entries.len(), "Cached entries are fresh");
            RescrapeDecision::cached(record.entries)
        } else {
            debug!(last_refresh = %record.last_refresh, "Record expired");
            RescrapeDecision::rescrape()
        }
    }

    /// Replace the record for `key` with `entries`, stamped now.
    ///
    /// The stamp is truncated to whole milliseconds, the precision records
    /// are persisted with, so the returned record equals the stored one.
    ///
    /// Writes to the same key are serialised. The returned record is usable
    /// even when it could not be persisted.
    #[instrument(skip(self, entries), fields(cache_key = %key, entries = entries.len()))]
    pub async fn commit(
        &self,
        key: &CacheKey,
        source_url: &str,
        entries: Vec<CalendarEntry>,
    ) -> StalenessRecord {
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        let record = StalenessRecord::new(key.clone(), source_url, self.refresh_stamp(), entries);

        match self.repository.save(&record).await {
            Ok(()) => {
                self.overlay.remove(key);
                info!(last_refresh = %record.last_refresh, "Committed scrape results");
            }
            Err(err) => {
                warn!(error = %err, "Failed to persist scrape results; keeping them for this session only");
                self.overlay.insert(key.clone(), record.clone());
            }
        }

        record
    }

    /// Forget the record for `key` so the next check rescrapes
    #[instrument(skip(self), fields(cache_key = %key))]
    pub async fn invalidate(&self, key: &CacheKey) {
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        self.overlay.remove(key);
        match self.repository.delete(key).await {
            Ok(existed) => debug!(existed, "Record invalidated"),
            Err(err) => warn!(error = %err, "Failed to delete record"),
        }
    }

    /// The record currently in effect for `key`, if any
    pub async fn current_record(&self, key: &CacheKey) -> Option<StalenessRecord> {
        if let Some(record) = self.overlay.get(key) {
            return Some(record.clone());
        }

        match self.repository.load(key).await {
            Ok(record) => record,
            Err(err) => {
                warn!(cache_key = %key, error = %err, "Failed to read record; treating as missing");
                None
            }
        }
    }

    fn refresh_stamp(&self) -> DateTime<Utc> {
        self.clock.now_utc().trunc_subsecs(3)
    }

    fn key_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        self.write_locks.entry(key.clone()).or_default().value().clone()
    }
}
