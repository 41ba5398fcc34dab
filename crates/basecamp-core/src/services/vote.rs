//! Vote Tracker - per-viewer vote state reconciled into post counters.

use std::sync::Arc;

use serde::Serialize;

use super::post_store::{PostStore, vote_key};
use crate::domain::{Post, PostId, Vote};
use crate::error::{BoardError, BoardResult};
use crate::ports::KeyValueStore;

/// Result of a vote action: the viewer's new vote and the counter changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub new_vote: Option<Vote>,
    pub like_delta: i64,
    pub dislike_delta: i64,
}

/// Resolve a vote action against the viewer's prior vote.
///
/// Repeating the active direction retracts it; the other direction switches.
pub fn cast_vote(prior: Option<Vote>, requested: Vote) -> VoteOutcome {
    let mut like_delta = 0;
    let mut dislike_delta = 0;

    if prior == Some(requested) {
        match requested {
            Vote::Up => like_delta -= 1,
            Vote::Down => dislike_delta -= 1,
        }
        return VoteOutcome {
            new_vote: None,
            like_delta,
            dislike_delta,
        };
    }

    match prior {
        Some(Vote::Up) => like_delta -= 1,
        Some(Vote::Down) => dislike_delta -= 1,
        None => {}
    }
    match requested {
        Vote::Up => like_delta += 1,
        Vote::Down => dislike_delta += 1,
    }

    VoteOutcome {
        new_vote: Some(requested),
        like_delta,
        dislike_delta,
    }
}

impl VoteOutcome {
    /// Apply the deltas to a post. Counters never drop below zero.
    pub fn apply(&self, post: &mut Post) {
        post.likes = post.likes.saturating_add_signed(self.like_delta);
        post.dislikes = post.dislikes.saturating_add_signed(self.dislike_delta);
        post.user_vote = self.new_vote;
    }
}

/// Tracks one viewer's votes, stored under `post_{id}_vote`.
pub struct VoteTracker {
    posts: Arc<PostStore>,
    votes: Arc<dyn KeyValueStore>,
}

impl VoteTracker {
    pub fn new(posts: Arc<PostStore>, votes: Arc<dyn KeyValueStore>) -> Self {
        Self { posts, votes }
    }

    pub async fn current_vote(&self, id: PostId) -> BoardResult<Option<Vote>> {
        let key = vote_key(id);
        let Some(raw) = self.votes.get(&key).await? else {
            return Ok(None);
        };

        match raw.parse::<Vote>() {
            Ok(vote) => Ok(Some(vote)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring unreadable vote flag");
                Ok(None)
            }
        }
    }

    /// Cast `requested` on a post and persist both the counters and the flag.
    ///
    /// The prior vote is read and both writes happen while holding the post
    /// store's writer, so concurrent votes by one viewer are applied in turn.
    /// If the flag cannot be written the counters are restored.
    pub async fn vote(&self, id: PostId, requested: Vote) -> BoardResult<Post> {
        let writer = self.posts.writer().await;

        let prior = self.current_vote(id).await?;
        let outcome = cast_vote(prior, requested);

        let before = writer.load_persisted().await?;
        let posts = writer.update_one(id, |post| outcome.apply(post)).await?;

        if let Err(e) = self.write_flag(id, outcome.new_vote).await {
            if let Err(undo) = writer.save(&before).await {
                tracing::error!(post_id = id, error = %undo, "Failed to restore vote counters");
            }
            return Err(e);
        }

        tracing::debug!(
            post_id = id,
            prior = ?prior,
            vote = ?outcome.new_vote,
            "Vote recorded"
        );

        let mut post = posts
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(BoardError::PostNotFound { id })?;
        post.user_vote = outcome.new_vote;
        Ok(post)
    }

    async fn write_flag(&self, id: PostId, vote: Option<Vote>) -> BoardResult<()> {
        let key = vote_key(id);
        match vote {
            Some(vote) => self.votes.set(&key, vote.as_str()).await?,
            None => self.votes.remove(&key).await?,
        }
        Ok(())
    }

    /// Fill `user_vote` on each post from the stored flags.
    pub async fn attach_votes(&self, posts: &mut [Post]) -> BoardResult<()> {
        for post in posts.iter_mut() {
            post.user_vote = self.current_vote(post.id).await?;
        }
        Ok(())
    }
}
