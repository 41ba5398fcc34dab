//! Post Store - owner and single writer of the persisted post collection.
//!
//! Every write is read-entire-collection, mutate in memory, write-entire-collection
//! under one key, so a reader never sees a partial collection. Writes within the
//! process are serialized; writers in other processes sharing the same storage
//! race and the last one wins.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::seed::{is_seed_id, seed_post, seed_posts};
use crate::domain::{Post, PostId};
use crate::error::{BoardError, BoardResult};
use crate::ports::KeyValueStore;

/// Storage key of the persisted user-post array.
pub const BOARD_POSTS_KEY: &str = "board_posts";

/// Storage key of a viewer's vote on a post.
pub fn vote_key(id: PostId) -> String {
    format!("post_{}_vote", id)
}

/// Session storage key marking a post as viewed.
pub fn viewed_key(id: PostId) -> String {
    format!("post_{}_viewed", id)
}

pub struct PostStore {
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl PostStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Persisted posts only. Missing or malformed content reads as empty.
    pub async fn load_persisted(&self) -> BoardResult<Vec<Post>> {
        let Some(raw) = self.storage.get(BOARD_POSTS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Post>>(&raw) {
            Ok(posts) => Ok(posts),
            Err(e) => {
                tracing::warn!(
                    key = BOARD_POSTS_KEY,
                    error = %e,
                    "Malformed persisted posts, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Persisted posts followed by the seed posts they don't shadow.
    pub async fn load(&self) -> BoardResult<Vec<Post>> {
        let persisted = self.load_persisted().await?;
        Ok(merge_with_seeds(persisted))
    }

    /// Replace the persisted collection in a single write.
    pub async fn save(&self, posts: &[Post]) -> BoardResult<()> {
        self.writer().await.save(posts).await
    }

    pub async fn find(&self, id: PostId) -> BoardResult<Option<Post>> {
        Ok(self.load().await?.into_iter().find(|p| p.id == id))
    }

    /// Take the write lock. Every mutation of the collection goes through a
    /// writer, so a read-modify-write sequence held by one writer is never
    /// interleaved with another.
    pub async fn writer(&self) -> PostWriter<'_> {
        PostWriter {
            store: self,
            _guard: self.write_lock.lock().await,
        }
    }

    /// Apply `patch` to one post and persist it.
    pub async fn update_one<F>(&self, id: PostId, patch: F) -> BoardResult<Vec<Post>>
    where
        F: FnOnce(&mut Post),
    {
        self.writer().await.update_one(id, patch).await
    }

    /// Insert a new post at the front of the persisted collection.
    pub async fn prepend(&self, post: Post) -> BoardResult<Vec<Post>> {
        self.writer().await.prepend(post).await
    }

    async fn write_unlocked(&self, posts: &[Post]) -> BoardResult<()> {
        let raw = serde_json::to_string(posts)?;
        self.storage.set(BOARD_POSTS_KEY, &raw).await?;
        tracing::debug!(count = posts.len(), bytes = raw.len(), "Saved board posts");
        Ok(())
    }
}

/// Exclusive write access to the post collection, released on drop.
pub struct PostWriter<'a> {
    store: &'a PostStore,
    _guard: MutexGuard<'a, ()>,
}

impl PostWriter<'_> {
    pub async fn load_persisted(&self) -> BoardResult<Vec<Post>> {
        self.store.load_persisted().await
    }

    pub async fn save(&self, posts: &[Post]) -> BoardResult<()> {
        self.store.write_unlocked(posts).await
    }

    /// Apply `patch` to one post and persist it.
    ///
    /// A seed post that has not been persisted yet is copied into the
    /// persisted collection first, so its votes and views survive reloads.
    /// Returns the updated merged collection.
    pub async fn update_one<F>(&self, id: PostId, patch: F) -> BoardResult<Vec<Post>>
    where
        F: FnOnce(&mut Post),
    {
        let mut persisted = self.load_persisted().await?;

        match persisted.iter_mut().find(|p| p.id == id) {
            Some(post) => patch(post),
            None => {
                let mut post = seed_post(id).ok_or(BoardError::PostNotFound { id })?;
                patch(&mut post);
                tracing::debug!(post_id = id, "Migrating seed post into persisted storage");
                persisted.push(post);
            }
        }

        self.save(&persisted).await?;
        Ok(merge_with_seeds(persisted))
    }

    /// Insert a new post at the front of the persisted collection.
    ///
    /// An id already taken by another post is bumped past the largest id in use.
    pub async fn prepend(&self, mut post: Post) -> BoardResult<Vec<Post>> {
        let mut persisted = self.load_persisted().await?;

        let taken = |id: PostId| is_seed_id(id) || persisted.iter().any(|p| p.id == id);
        if taken(post.id) {
            let max_id = persisted
                .iter()
                .map(|p| p.id)
                .chain(seed_posts().iter().map(|p| p.id))
                .max()
                .unwrap_or(0);
            post.id = max_id.max(post.id) + 1;
            for (index, file) in post.files.iter_mut().enumerate() {
                file.id = format!("{}-{}", post.id, index);
            }
        }

        persisted.insert(0, post);
        self.save(&persisted).await?;
        Ok(merge_with_seeds(persisted))
    }
}

fn merge_with_seeds(mut persisted: Vec<Post>) -> Vec<Post> {
    let seeds: Vec<Post> = seed_posts()
        .into_iter()
        .filter(|seed| !persisted.iter().any(|p| p.id == seed.id))
        .collect();
    persisted.extend(seeds);
    persisted
}
