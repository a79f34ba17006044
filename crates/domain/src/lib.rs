//! # CampusCal Domain
//!
//! Business domain types for the campus calendar scraping core.
//!
//! This crate contains:
//! - Calendar entry, cache key and staleness record types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and small pure utilities (timestamp parsing, meal
//!   ordering)
//!
//! ## Architecture
//! - No dependencies on other CampusCal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::meal_order::{order_meals, MealHours, MealSchedule};
