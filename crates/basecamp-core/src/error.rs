//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;
use crate::ports::{ChainError, StorageError};

/// Board errors - failures surfaced by the board services.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No wallet connected: an author identity is required")]
    MissingIdentity,

    #[error("Post not found: {id}")]
    PostNotFound { id: PostId },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Post has no donation address")]
    MissingDonationAddress,

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("Chain failure: {0}")]
    Chain(#[from] ChainError),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Serialization(err.to_string())
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
