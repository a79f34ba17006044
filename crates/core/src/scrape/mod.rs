//! Scrape pipeline: fetch + parse engine, orchestration and completion
//! delivery

pub mod delegate;
pub mod engine;
pub mod orchestrator;
pub mod ports;
pub mod registry;

pub use delegate::{CallbackDispatcher, CallbackLoop, ScrapeDelegate};
pub use engine::ScrapeEngine;
pub use orchestrator::ScrapeOrchestrator;
pub use ports::{CalendarFetcher, SourceParser};
pub use registry::ParserRegistry;
