//! # CampusCal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite persistence for staleness records
//! - HTTP fetching via `reqwest`
//! - Parsers for the academic HTML page, iCalendar feeds and JSON feeds
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `campuscal-core`
//! - Depends on `campuscal-common` and `campuscal-core`
//! - Contains all "impure" code (I/O, network, file system)

pub mod config;
pub mod context;
pub mod database;
pub mod errors;
pub mod http;
pub mod observability;
pub mod parsers;

// Re-export commonly used items
pub use context::CampusCalContext;
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use observability::{init_tracing, LogFormat};
pub use parsers::{default_registry, AcademicHtmlParser, IcsParser, JsonFeedParser};
