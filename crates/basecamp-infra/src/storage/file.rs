//! JSON-file key-value store - the durable stand-in for browser local storage.
//!
//! The whole map lives in one JSON object on disk. Every write serializes the
//! full map to a temp file in the same directory and renames it over the old
//! file, so readers see either the old or the new contents, never a mix.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use basecamp_core::ports::{KeyValueStore, StorageError};

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts empty. An unreadable JSON document also starts
    /// empty; it is replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Unreadable store file, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "File store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, snapshot: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(snapshot).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io = |e: std::io::Error| StorageError::Io(format!("{}: {}", path.display(), e));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io)?;
    tmp.write_all(bytes).map_err(io)?;
    tmp.as_file().sync_all().map_err(io)?;
    tmp.persist(path).map_err(|e| io(e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());

        // Memory only changes once the file is on disk
        self.persist(&next).await?;
        *entries = next;
        tracing::debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());

        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local-storage.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("board_posts", "[]").await.unwrap();
        store.set("post_1_vote", "up").await.unwrap();
        store.remove("post_1_vote").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("board_posts").await.unwrap(),
            Some("[]".to_string())
        );
        assert_eq!(reopened.get("post_1_vote").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "{{{ not json").unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("board_posts").await.unwrap(), None);

        store.set("board_posts", "[]").await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"board_posts":"[]"}"#);
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/data/store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert!(path.exists());
    }
}
