//! Calendar source descriptors

use serde::{Deserialize, Serialize};
use url::Url;

use super::cache_key::CacheKey;
use crate::errors::{CampusCalError, Result};
use crate::impl_domain_enum_conversions;

/// Markup or feed format served by a calendar source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Registrar-style HTML page with `.event-list` markup
    AcademicHtml,
    /// RFC 5545 iCalendar feed
    #[serde(rename = "icalendar")]
    ICalendar,
    /// `{"events": [...]}` JSON feed
    JsonFeed,
}

impl_domain_enum_conversions!(SourceFormat {
    AcademicHtml => "academic_html",
    ICalendar => "icalendar",
    JsonFeed => "json_feed",
});

/// Where one call site scrapes from and which record it caches into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub key: CacheKey,
    pub url: Url,
    pub format: SourceFormat,
}

impl CalendarSource {
    pub fn new(key: CacheKey, url: Url, format: SourceFormat) -> Self {
        Self { key, url, format }
    }

    /// Build a source from an unparsed URL string.
    ///
    /// # Errors
    /// Returns `CampusCalError::InvalidInput` when the URL does not parse or
    /// is not http(s).
    pub fn parse(key: CacheKey, url: &str, format: SourceFormat) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| CampusCalError::InvalidInput(format!("invalid source URL '{url}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CampusCalError::InvalidInput(format!(
                "unsupported URL scheme '{}' for source {key}",
                url.scheme()
            )));
        }
        Ok(Self { key, url, format })
    }
}
