//! Application constants
//!
//! Centralized location for domain-level constants.

// Staleness policy
pub const DEFAULT_SCRAPE_TTL_SECS: u64 = 24 * 60 * 60;

// Network
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_USER_AGENT: &str = concat!("campuscal/", env!("CARGO_PKG_VERSION"));

// Persistence
pub const DEFAULT_DB_PATH: &str = "campuscal.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
/// Bumped whenever the serialized entry layout changes; older records are
/// treated as absent.
pub const RECORD_FORMAT_VERSION: u32 = 1;

// Known sources
pub const ACADEMIC_CALENDAR_URL: &str = "https://registrar.berkeley.edu/calendar/";
pub const CAMPUSWIDE_CALENDAR_URL: &str = "https://events.berkeley.edu/live/ical/events";

// User-facing failure alert
pub const SCRAPE_FAILURE_TITLE: &str = "Unable To Parse Website";
