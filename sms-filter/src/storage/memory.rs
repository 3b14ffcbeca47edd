//! In-memory collection storage
//!
//! Keeps records in a map for the lifetime of the process. Useful for tests
//! and for hosts that manage durability themselves.

use crate::error::{FilterError, Result};
use crate::storage::{Collection, CollectionStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<serde_json::Value>>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection (builder style)
    pub fn with_records(mut self, collection: Collection, records: Vec<serde_json::Value>) -> Self {
        self.collections.get_mut().insert(collection, records);
        self
    }

    /// Make every subsequent `save` fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current records of a collection, if it was ever written
    pub async fn records(&self, collection: Collection) -> Option<Vec<serde_json::Value>> {
        self.collections.read().await.get(&collection).cloned()
    }

    /// Number of successful saves across all collections
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CollectionStore for MemoryStore {
    async fn load(&self, collection: Collection) -> Result<Option<Vec<serde_json::Value>>> {
        Ok(self.records(collection).await)
    }

    async fn save(&self, collection: Collection, records: Vec<serde_json::Value>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FilterError::Storage(format!(
                "writes to {} are disabled",
                collection
            )));
        }

        self.collections.write().await.insert(collection, records);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
