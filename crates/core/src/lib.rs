//! # CampusCal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for fetching, parsing and record
//!   persistence
//! - The staleness store deciding when cached scrapes can be reused
//! - The scrape engine, orchestrator and callback dispatcher
//!
//! ## Architecture Principles
//! - Only depends on `campuscal-common` and `campuscal-domain`
//! - No database, HTTP, or markup parsing code
//! - All external dependencies via traits

pub mod scrape;
pub mod staleness;

pub use scrape::{
    CalendarFetcher, CallbackDispatcher, CallbackLoop, ParserRegistry, ScrapeDelegate, ScrapeEngine,
    ScrapeOrchestrator, SourceParser,
};
pub use staleness::{RecordRepository, StalenessStore};
