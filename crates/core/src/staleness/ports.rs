//! Port interfaces for staleness record persistence

use async_trait::async_trait;
use campuscal_domain::{CacheKey, Result, StalenessRecord};

/// Durable storage for staleness records, one per cache key
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Load the record for `key`, if one has been saved
    async fn load(&self, key: &CacheKey) -> Result<Option<StalenessRecord>>;

    /// Insert or wholly replace the record for `record.cache_key`
    async fn save(&self, record: &StalenessRecord) -> Result<()>;

    /// Remove the record for `key`; returns whether one existed
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
}
