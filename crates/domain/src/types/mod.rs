//! Domain types for calendar scraping and caching

pub mod cache_key;
pub mod entry;
pub mod outcome;
pub mod source;
pub mod staleness;

pub use cache_key::CacheKey;
pub use entry::{CalendarEntry, CalendarEntryBuilder};
pub use outcome::{FailureNotice, ScrapeOutcome, ScrapePhase};
pub use source::{CalendarSource, SourceFormat};
pub use staleness::{RescrapeDecision, StalenessRecord};
