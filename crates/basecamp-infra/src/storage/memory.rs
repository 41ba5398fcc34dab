//! In-memory key-value store - session-scoped flags, and the fallback when no
//! data file is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use basecamp_core::ports::{KeyValueStore, StorageError};

/// In-memory store using a HashMap behind an async RwLock.
///
/// An optional quota caps the total bytes of keys plus values, the way
/// browser storage does.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    store: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            quota: Some(quota_bytes),
        }
    }

    fn check_quota(
        &self,
        store: &HashMap<String, String>,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let Some(limit) = self.quota else {
            return Ok(());
        };

        let others: usize = store
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let needed = others + key.len() + value.len();

        if needed > limit {
            tracing::warn!(key = %key, needed, limit, "Storage quota exceeded");
            return Err(StorageError::QuotaExceeded { needed, limit });
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        self.check_quota(&store, key, value)?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        // Single write lock makes the check and the insert atomic
        let mut store = self.store.write().await;
        if store.contains_key(key) {
            return Ok(false);
        }
        self.check_quota(&store, key, value)?;
        store.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}
