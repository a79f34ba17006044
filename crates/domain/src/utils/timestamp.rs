//! Timestamp parsing shared by the feed parsers

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{CampusCalError, Result};

/// Parse an RFC 3339 timestamp, treating a value without an offset as UTC.
///
/// # Errors
/// Returns `CampusCalError::Parse` naming `field` when the value is not a
/// valid timestamp.
pub fn parse_event_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed.ends_with('z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));

    let candidate = if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CampusCalError::Parse(format!("Invalid {field} timestamp '{value}': {e}")))
}

/// Parse a `YYYY-MM-DD` all-day date as midnight UTC.
///
/// # Errors
/// Returns `CampusCalError::Parse` naming `field` when the date is invalid.
pub fn parse_all_day_date(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| CampusCalError::Parse(format!("Invalid all-day {field} date '{value}': {e}")))?;

    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        CampusCalError::Parse(format!("Invalid all-day {field} date '{value}': could not derive midnight"))
    })?;

    Ok(midnight.and_utc())
}

/// Accept either a full timestamp or a bare all-day date
pub fn parse_date_or_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    if value.trim().contains('T') {
        parse_event_timestamp(value, field)
    } else {
        parse_all_day_date(value, field)
    }
}
