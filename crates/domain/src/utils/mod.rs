//! Small pure helpers

pub mod meal_order;
pub mod timestamp;

pub use timestamp::{parse_all_day_date, parse_date_or_timestamp, parse_event_timestamp};
