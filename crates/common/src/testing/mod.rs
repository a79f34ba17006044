//! Testing utilities shared by downstream integration tests
//!
//! - **[`temp`]**: temporary directories that clean up on drop

pub mod temp;

pub use temp::TempDir;
