//! Bounded in-memory session flags.
//!
//! Each session gets its own flag map. Sessions idle for longer than the TTL
//! expire, and when the table is full the least recently seen one is evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use basecamp_core::ports::{KeyValueStore, StorageError};

pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    flags: HashMap<String, String>,
    last_seen: Instant,
}

/// Session table with a capacity and an idle TTL.
///
/// Note: Data is lost on process restart.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    capacity: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            idle_ttl,
        }
    }

    /// Key-value view over one session's flags.
    pub fn scope(self: &Arc<Self>, session_id: &str) -> SessionScope {
        SessionScope {
            store: self.clone(),
            session_id: session_id.to_string(),
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|entry| !self.is_expired(entry))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        entry.last_seen.elapsed() > self.idle_ttl
    }

    /// Make room for one more session.
    fn evict(&self, sessions: &mut HashMap<String, SessionEntry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry));
        let expired = before - sessions.len();

        let mut evicted = 0;
        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    evicted += 1;
                }
                None => break,
            }
        }

        if expired + evicted > 0 {
            tracing::debug!(expired, evicted, live = sessions.len(), "Sessions pruned");
        }
    }

    /// Run `f` on the flags of a live session. An expired session reads as absent.
    async fn read<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&HashMap<String, String>) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        let expired = sessions.get(session_id).map(|entry| self.is_expired(entry))?;
        if expired {
            sessions.remove(session_id);
            return None;
        }

        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = Instant::now();
        Some(f(&entry.flags))
    }

    /// Run `f` on the flags of a session, creating it if needed.
    async fn write<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> R {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(session_id)
            .is_some_and(|entry| self.is_expired(entry))
        {
            sessions.remove(session_id);
        }
        if !sessions.contains_key(session_id) {
            self.evict(&mut sessions);
        }

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                flags: HashMap::new(),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        f(&mut entry.flags)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE)
    }
}

/// One session's flags inside a [`SessionStore`].
pub struct SessionScope {
    store: Arc<SessionStore>,
    session_id: String,
}

#[async_trait]
impl KeyValueStore for SessionScope {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .read(&self.session_id, |flags| flags.get(key).cloned())
            .await
            .flatten())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store
            .write(&self.session_id, |flags| {
                flags.insert(key.to_string(), value.to_string());
            })
            .await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut sessions = self.store.sessions.lock().await;
        if let Some(entry) = sessions.get_mut(&self.session_id) {
            entry.flags.remove(key);
        }
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        let stored = self
            .store
            .write(&self.session_id, |flags| {
                if flags.contains_key(key) {
                    return false;
                }
                flags.insert(key.to_string(), value.to_string());
                true
            })
            .await;
        Ok(stored)
    }
}
