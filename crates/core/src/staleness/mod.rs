//! Staleness tracking for cached scrape results

pub mod ports;
pub mod store;

pub use ports::RecordRepository;
pub use store::StalenessStore;
