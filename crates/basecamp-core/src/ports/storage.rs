use async_trait::async_trait;

/// Key-value store trait - abstraction over local persistence (file, in-memory).
///
/// Values are whole strings; a `set` replaces the previous value in one step,
/// so readers never observe a partially written value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Check if a key exists.
    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Store a value only if the key is absent. Returns `true` if it was stored.
    ///
    /// Implementations that can do this atomically should override it.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        if self.contains(key).await? {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }
}

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded: needed {needed} bytes, limit {limit} bytes")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("I/O failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
