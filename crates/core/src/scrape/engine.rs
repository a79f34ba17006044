//! Fetch + parse engine

use std::sync::Arc;

use campuscal_domain::{CalendarEntry, CalendarSource, CampusCalError, Result};
use tracing::{debug, instrument, warn};

use super::ports::CalendarFetcher;
use super::registry::ParserRegistry;

/// Fetches a source and parses it with the parser registered for its format.
///
/// Holds no per-source state, so concurrent scrapes of different sources are
/// independent. Requests for the same source are not deduplicated here.
pub struct ScrapeEngine {
    fetcher: Arc<dyn CalendarFetcher>,
    parsers: ParserRegistry,
}

impl ScrapeEngine {
    pub fn new(fetcher: Arc<dyn CalendarFetcher>, parsers: ParserRegistry) -> Self {
        Self { fetcher, parsers }
    }

    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// Fetch `source` and parse it into entries.
    ///
    /// # Errors
    /// - `CampusCalError::Config` if no parser is registered for the format
    /// - `CampusCalError::Network` if the fetch fails
    /// - `CampusCalError::Parse` if the body cannot be parsed
    #[instrument(skip(self, source), fields(cache_key = %source.key, url = %source.url, format = %source.format))]
    pub async fn scrape(&self, source: &CalendarSource) -> Result<Vec<CalendarEntry>> {
        let parser = self.parsers.get(source.format).ok_or_else(|| {
            CampusCalError::Config(format!("no parser registered for format '{}'", source.format))
        })?;

        let body = self.fetcher.fetch(&source.url).await?;
        debug!(bytes = body.len(), "Fetched source body");

        let entries = parser.parse(&body).map_err(|err| {
            let err = as_parse_error(err, source);
            warn!(error = %err, "Failed to parse source body");
            err
        })?;

        debug!(entries = entries.len(), "Parsed calendar entries");
        Ok(entries)
    }
}

/// Parser failures always surface as `Parse` with a non-empty description
fn as_parse_error(err: CampusCalError, source: &CalendarSource) -> CampusCalError {
    let description = err.description().trim();
    if description.is_empty() {
        CampusCalError::Parse(format!("Unrecognised {} content from {}", source.format, source.url))
    } else {
        CampusCalError::Parse(description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use campuscal_domain::{CacheKey, SourceFormat};

    use super::*;

    fn source() -> CalendarSource {
        CalendarSource::parse(CacheKey::CAMPUS_EVENTS, "https://events.example.edu/feed", SourceFormat::JsonFeed)
            .unwrap()
    }

    #[test]
    fn parse_errors_keep_their_message() {
        let err = as_parse_error(CampusCalError::InvalidInput("entry title is empty".into()), &source());
        assert_eq!(err, CampusCalError::Parse("entry title is empty".into()));
    }

    #[test]
    fn blank_parse_errors_get_a_description() {
        let err = as_parse_error(CampusCalError::Parse(String::new()), &source());
        assert!(err.description().contains("json_feed"));
        assert!(err.description().contains("events.example.edu"));
    }
}
