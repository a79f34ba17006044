//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CampusCal
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CampusCalError {
    /// Connectivity, timeout or non-success HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// Fetched content could not be mapped to calendar entries
    #[error("Parse error: {0}")]
    Parse(String),

    /// Local persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CampusCalError {
    /// Whether this failure belongs to a scrape attempt (network or parse).
    ///
    /// Both kinds are reported to the caller the same way; storage failures
    /// are absorbed by the staleness store and never reach this point.
    pub fn is_scrape_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }

    /// Human-readable description without the category prefix, suitable for
    /// showing directly in an alert.
    pub fn description(&self) -> &str {
        match self {
            Self::Network(msg)
            | Self::Parse(msg)
            | Self::Storage(msg)
            | Self::Config(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for CampusCal operations
pub type Result<T> = std::result::Result<T, CampusCalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_parse_are_scrape_failures() {
        assert!(CampusCalError::Network("timeout".into()).is_scrape_failure());
        assert!(CampusCalError::Parse("missing table".into()).is_scrape_failure());
        assert!(!CampusCalError::Storage("disk full".into()).is_scrape_failure());
    }

    #[test]
    fn description_strips_category() {
        let err = CampusCalError::Parse("no .event-list container".into());
        assert_eq!(err.description(), "no .event-list container");
        assert_eq!(err.to_string(), "Parse error: no .event-list container");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&CampusCalError::Network("HTTP 503".into())).unwrap();
        assert_eq!(json, r#"{"type":"Network","message":"HTTP 503"}"#);
    }
}
