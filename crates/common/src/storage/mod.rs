//! Storage primitives for local SQLite databases
//!
//! Provides an r2d2-backed connection pool with per-connection pragmas and a
//! storage error type shared by repository implementations.

pub mod config;
pub mod error;
pub mod pool;
pub mod pragmas;

// Re-export commonly used types
pub use config::SqlitePoolConfig;
pub use error::{StorageError, StorageResult};
pub use pool::{SqliteConnection, SqlitePool};
pub use pragmas::apply_connection_pragmas;
