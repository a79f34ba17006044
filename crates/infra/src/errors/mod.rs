//! Infrastructure error mapping

pub mod conversions;

pub use conversions::{json_error, InfraError, JsonContext};
