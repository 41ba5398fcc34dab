//! Board facade - wires the services over one persisted collection.

use std::sync::Arc;

use super::composer::PostComposer;
use super::post_store::PostStore;
use super::query::{BoardQuery, DEFAULT_PAGE_SIZE, PostPage, all_categories, all_tags, run_query};
use super::views::ViewCounter;
use super::vote::VoteTracker;
use crate::domain::Post;
use crate::error::BoardResult;
use crate::ports::{KeyValueStore, WalletClient};

/// Board settings.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub page_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Tags and categories currently in use.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Facets {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// Entry point for the rendering layer.
///
/// Votes are stored per viewer and view flags per session, so those
/// services are built from the caller's stores on demand.
pub struct Board {
    config: BoardConfig,
    posts: Arc<PostStore>,
}

impl Board {
    pub fn new(storage: Arc<dyn KeyValueStore>, config: BoardConfig) -> Self {
        Self {
            config,
            posts: Arc::new(PostStore::new(storage)),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn posts(&self) -> &Arc<PostStore> {
        &self.posts
    }

    pub fn vote_tracker(&self, viewer: Arc<dyn KeyValueStore>) -> VoteTracker {
        VoteTracker::new(self.posts.clone(), viewer)
    }

    pub fn view_counter(&self, session: Arc<dyn KeyValueStore>) -> ViewCounter {
        ViewCounter::new(self.posts.clone(), session)
    }

    pub fn composer(&self, wallet: Arc<dyn WalletClient>) -> PostComposer {
        PostComposer::new(self.posts.clone(), wallet)
    }

    /// Re-read persisted state with the viewer's votes joined in.
    ///
    /// Safe to call at any time, e.g. when the window regains focus.
    pub async fn refresh(&self, votes: &VoteTracker) -> BoardResult<Vec<Post>> {
        let mut posts = self.posts.load().await?;
        votes.attach_votes(&mut posts).await?;
        Ok(posts)
    }

    /// Refresh and run `query` with the configured page size.
    pub async fn browse(&self, votes: &VoteTracker, query: &BoardQuery) -> BoardResult<PostPage> {
        let posts = self.refresh(votes).await?;
        Ok(run_query(&posts, query, self.config.page_size))
    }

    pub async fn facets(&self) -> BoardResult<Facets> {
        let posts = self.posts.load().await?;
        Ok(Facets {
            tags: all_tags(&posts),
            categories: all_categories(&posts),
        })
    }
}
