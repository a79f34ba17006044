//! Time abstractions
//!
//! Provides a [`Clock`] trait so staleness windows and refresh stamps can be
//! driven by real time in production and by [`MockClock`] in tests.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use campuscal_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let before = clock.now_utc();
//! clock.advance(Duration::from_secs(3600));
//! assert_eq!((clock.now_utc() - before).num_seconds(), 3600);
//! ```

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
