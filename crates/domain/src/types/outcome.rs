//! Scrape outcomes, orchestration phases and user-facing failure notices

use serde::{Deserialize, Serialize};

use super::entry::CalendarEntry;
use crate::constants::SCRAPE_FAILURE_TITLE;
use crate::errors::CampusCalError;
use crate::impl_domain_enum_conversions;

/// Terminal result of one scrape request, as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Finished(Vec<CalendarEntry>),
    /// Plain-text description suitable for direct display
    Failed(String),
}

impl ScrapeOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub fn entries(&self) -> Option<&[CalendarEntry]> {
        match self {
            Self::Finished(entries) => Some(entries),
            Self::Failed(_) => None,
        }
    }

    /// Alert content for a failed outcome
    pub fn failure_notice(&self) -> Option<FailureNotice> {
        match self {
            Self::Finished(_) => None,
            Self::Failed(description) => Some(FailureNotice::new(description.clone())),
        }
    }
}

impl From<CampusCalError> for ScrapeOutcome {
    fn from(err: CampusCalError) -> Self {
        let description = err.description().trim();
        if description.is_empty() {
            Self::Failed(err.to_string())
        } else {
            Self::Failed(description.to_string())
        }
    }
}

/// Title and message for the alert shown when a scrape fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotice {
    pub title: String,
    pub message: String,
}

impl FailureNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self { title: SCRAPE_FAILURE_TITLE.to_string(), message: message.into() }
    }
}

/// Where a cache key currently sits in the refresh pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapePhase {
    #[default]
    Idle,
    Checking,
    CacheHit,
    Fetching,
    Succeeded,
    Failed,
}

impl ScrapePhase {
    /// A fetch for this key is running
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Fetching)
    }
}

impl_domain_enum_conversions!(ScrapePhase {
    Idle => "idle",
    Checking => "checking",
    CacheHit => "cache_hit",
    Fetching => "fetching",
    Succeeded => "succeeded",
    Failed => "failed",
});
