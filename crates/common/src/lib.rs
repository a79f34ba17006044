//! Modular common utilities shared across CampusCal crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: clock abstraction (system and mock time)
//! - `platform`: SQLite connection pooling
//! - `test-utils`: temporary directory helpers for integration tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use storage::{SqlitePool, SqlitePoolConfig, StorageError, StorageResult};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
