//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    ACADEMIC_CALENDAR_URL, CAMPUSWIDE_CALENDAR_URL, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCRAPE_TTL_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::{CampusCalError, Result};
use crate::types::{CacheKey, CalendarSource, SourceFormat};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Scrape pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Cached entries older than this are refetched
    pub ttl_seconds: u64,
    pub request_timeout_seconds: u64,
    /// Total HTTP attempts per fetch; 1 disables retries
    pub max_attempts: usize,
    pub user_agent: String,
}

/// One configured calendar source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub key: CacheKey,
    pub url: String,
    pub format: SourceFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            scrape: ScrapeConfig::default(),
            sources: default_sources(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SCRAPE_TTL_SECS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            key: CacheKey::ACADEMIC_EVENTS,
            url: ACADEMIC_CALENDAR_URL.to_string(),
            format: SourceFormat::AcademicHtml,
        },
        SourceConfig {
            key: CacheKey::CAMPUS_EVENTS,
            url: CAMPUSWIDE_CALENDAR_URL.to_string(),
            format: SourceFormat::ICalendar,
        },
    ]
}

impl ScrapeConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }
}

impl SourceConfig {
    /// Resolve into a validated source.
    ///
    /// # Errors
    /// Returns `CampusCalError::Config` when the URL is invalid.
    pub fn to_source(&self) -> Result<CalendarSource> {
        CalendarSource::parse(self.key.clone(), &self.url, self.format)
            .map_err(|e| CampusCalError::Config(e.description().to_string()))
    }
}

impl Config {
    /// Check value ranges and that every source resolves.
    ///
    /// # Errors
    /// Returns `CampusCalError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(CampusCalError::Config("database path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(CampusCalError::Config("database pool size must be at least 1".into()));
        }
        if self.scrape.request_timeout_seconds == 0 {
            return Err(CampusCalError::Config("request timeout must be at least 1 second".into()));
        }
        if self.scrape.max_attempts == 0 {
            return Err(CampusCalError::Config("max attempts must be at least 1".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.key.as_str()) {
                return Err(CampusCalError::Config(format!(
                    "cache key '{}' is configured for more than one source",
                    source.key
                )));
            }
            source.to_source()?;
        }
        Ok(())
    }

    /// Configured source for a cache key
    pub fn source(&self, key: &CacheKey) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| &s.key == key)
    }
}
