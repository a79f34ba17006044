//! In-memory mock for the record repository port

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campuscal_core::RecordRepository;
use campuscal_domain::{CacheKey, CampusCalError, Result as DomainResult, StalenessRecord};

/// Stores records in a shared map. Loads and saves can be switched to fail
/// to exercise the store's degradation paths.
#[derive(Default, Clone)]
pub struct MockRecordRepository {
    records: Arc<Mutex<HashMap<CacheKey, StalenessRecord>>>,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
}

impl MockRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the store
    pub fn with_record(self, record: StalenessRecord) -> Self {
        self.records.lock().unwrap().insert(record.cache_key.clone(), record);
        self
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &CacheKey) -> Option<StalenessRecord> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn load(&self, key: &CacheKey) -> DomainResult<Option<StalenessRecord>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(CampusCalError::Storage("disk I/O error".into()));
        }
        Ok(self.get(key))
    }

    async fn save(&self, record: &StalenessRecord) -> DomainResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CampusCalError::Storage("database is locked".into()));
        }
        self.records.lock().unwrap().insert(record.cache_key.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> DomainResult<bool> {
        Ok(self.records.lock().unwrap().remove(key).is_some())
    }
}
