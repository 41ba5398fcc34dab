//! Namespaced view over another store, e.g. one viewer's or one session's keys.

use std::sync::Arc;

use async_trait::async_trait;

use basecamp_core::ports::{KeyValueStore, StorageError};

pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    /// Keys are stored in `inner` as `<scope>:<key>`.
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: &str) -> Self {
        Self {
            inner,
            prefix: format!("{}:", scope),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for ScopedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(&self.scoped(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(&self.scoped(key), value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(&self.scoped(key)).await
    }

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.contains(&self.scoped(key)).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        self.inner.set_if_absent(&self.scoped(key), value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    #[tokio::test]
    async fn test_scopes_do_not_collide() {
        let shared: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let alice = ScopedStore::new(shared.clone(), "session:alice");
        let bob = ScopedStore::new(shared.clone(), "session:bob");

        assert!(alice.set_if_absent("post_3_viewed", "1").await.unwrap());
        assert!(bob.set_if_absent("post_3_viewed", "1").await.unwrap());
        assert!(!alice.set_if_absent("post_3_viewed", "1").await.unwrap());

        assert!(
            shared
                .contains("session:alice:post_3_viewed")
                .await
                .unwrap()
        );
    }
}
