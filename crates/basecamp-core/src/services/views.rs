//! View Counter - counts a post view at most once per session.

use std::sync::Arc;

use super::post_store::{PostStore, viewed_key};
use crate::domain::{Post, PostId};
use crate::error::{BoardError, BoardResult};
use crate::ports::KeyValueStore;

/// Whether the caller should count this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRegistration {
    pub should_increment: bool,
}

/// View counter for one browsing session.
///
/// `session` holds the session-scoped `post_{id}_viewed` flags and is expected
/// to be empty at the start of every new session.
pub struct ViewCounter {
    posts: Arc<PostStore>,
    session: Arc<dyn KeyValueStore>,
}

impl ViewCounter {
    pub fn new(posts: Arc<PostStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { posts, session }
    }

    /// Mark the post as seen in this session; true only the first time.
    pub async fn register_view(&self, id: PostId) -> BoardResult<ViewRegistration> {
        let should_increment = self.session.set_if_absent(&viewed_key(id), "1").await?;
        Ok(ViewRegistration { should_increment })
    }

    /// Open a post's detail view, counting the view if it is new to the session.
    pub async fn open(&self, id: PostId) -> BoardResult<Post> {
        if self.posts.find(id).await?.is_none() {
            return Err(BoardError::PostNotFound { id });
        }

        let registration = self.register_view(id).await?;
        if !registration.should_increment {
            return self
                .posts
                .find(id)
                .await?
                .ok_or(BoardError::PostNotFound { id });
        }

        match self.posts.update_one(id, |post| post.views += 1).await {
            Ok(posts) => {
                tracing::debug!(post_id = id, "View counted");
                posts
                    .into_iter()
                    .find(|p| p.id == id)
                    .ok_or(BoardError::PostNotFound { id })
            }
            Err(e) => {
                // Unmark so the view is counted on the next successful open.
                if let Err(undo) = self.session.remove(&viewed_key(id)).await {
                    tracing::warn!(post_id = id, error = %undo, "Failed to clear view flag");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MemoryStore;

    fn counter(local: Arc<MemoryStore>, session: Arc<MemoryStore>) -> ViewCounter {
        ViewCounter::new(Arc::new(PostStore::new(local)), session)
    }

    #[tokio::test]
    async fn test_register_view_true_exactly_once() {
        let counter = counter(Arc::default(), Arc::default());
        let mut hits = 0;
        for _ in 0..5 {
            if counter.register_view(3).await.unwrap().should_increment {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn test_open_twice_in_one_session_counts_once() {
        let counter = counter(Arc::default(), Arc::default());
        assert_eq!(counter.open(3).await.unwrap().views, 190);
        assert_eq!(counter.open(3).await.unwrap().views, 190);
    }

    #[tokio::test]
    async fn test_new_session_counts_again() {
        let local: Arc<MemoryStore> = Arc::default();
        counter(local.clone(), Arc::default()).open(3).await.unwrap();
        let post = counter(local, Arc::default()).open(3).await.unwrap();
        assert_eq!(post.views, 191);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_mark_viewed() {
        let local: Arc<MemoryStore> = Arc::default();
        let session: Arc<MemoryStore> = Arc::default();
        local
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let counter = counter(local, session.clone());
        assert!(counter.open(3).await.is_err());
        assert!(session.raw(&viewed_key(3)).is_none());
    }

    #[tokio::test]
    async fn test_open_unknown_post() {
        let counter = counter(Arc::default(), Arc::default());
        assert!(matches!(
            counter.open(42).await,
            Err(BoardError::PostNotFound { id: 42 })
        ));
    }
}
