//! Port interfaces for fetching and parsing calendar sources
//!
//! Infrastructure provides the HTTP fetcher and one parser per
//! [`SourceFormat`]; the engine only sees these traits.

use async_trait::async_trait;
use campuscal_domain::{CalendarEntry, Result, SourceFormat};
use url::Url;

/// Retrieves the raw body of a calendar source
#[async_trait]
pub trait CalendarFetcher: Send + Sync {
    /// GET `url` and return the response body.
    ///
    /// Connectivity failures, timeouts and non-2xx statuses are reported as
    /// `CampusCalError::Network`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Maps a raw body in one format to calendar entries
pub trait SourceParser: Send + Sync {
    /// Format this parser understands
    fn format(&self) -> SourceFormat;

    /// Parse `body` into entries in source order.
    ///
    /// Fails with `CampusCalError::Parse` on malformed content; never
    /// returns a partial list.
    fn parse(&self, body: &[u8]) -> Result<Vec<CalendarEntry>>;
}
