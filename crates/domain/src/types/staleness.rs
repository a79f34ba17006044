//! Staleness record and rescrape decision types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::cache_key::CacheKey;
use super::entry::CalendarEntry;
use crate::constants::RECORD_FORMAT_VERSION;

/// Last successful scrape for one cache key.
///
/// Replaced wholesale on every successful scrape; `entries` keeps the order
/// the parser produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessRecord {
    pub cache_key: CacheKey,
    pub source_url: String,
    pub last_refresh: DateTime<Utc>,
    pub entries: Vec<CalendarEntry>,
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

fn default_format_version() -> u32 {
    RECORD_FORMAT_VERSION
}

impl StalenessRecord {
    pub fn new(
        cache_key: CacheKey,
        source_url: impl Into<String>,
        last_refresh: DateTime<Utc>,
        entries: Vec<CalendarEntry>,
    ) -> Self {
        Self {
            cache_key,
            source_url: source_url.into(),
            last_refresh,
            entries,
            format_version: RECORD_FORMAT_VERSION,
        }
    }

    /// Whether this record was written by a layout this build understands
    pub fn is_current_format(&self) -> bool {
        self.format_version == RECORD_FORMAT_VERSION
    }

    /// Fresh while `now - last_refresh <= ttl`.
    ///
    /// A refresh timestamp in the future (clock moved backwards) counts as
    /// fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_refresh) <= ttl
    }
}

/// Result of a staleness query; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RescrapeDecision {
    pub should_rescrape: bool,
    pub saved_events: Vec<CalendarEntry>,
}

impl RescrapeDecision {
    /// No usable record: fetch again
    pub fn rescrape() -> Self {
        Self { should_rescrape: true, saved_events: Vec::new() }
    }

    /// Cached entries are still fresh
    pub fn cached(saved_events: Vec<CalendarEntry>) -> Self {
        Self { should_rescrape: false, saved_events }
    }
}
