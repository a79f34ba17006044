//! Database implementations

pub mod manager;
pub mod staleness_repository;

pub use manager::DbManager;
pub use staleness_repository::SqliteRecordRepository;
