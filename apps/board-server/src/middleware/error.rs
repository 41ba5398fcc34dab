//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use basecamp_core::BoardError;
use basecamp_core::ports::{ChainError, StorageError};
use basecamp_shared::ErrorResponse;

use super::session::SESSION_HEADER;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    MissingSession,
    /// The wallet is not connected.
    Unauthorized(String),
    Conflict(String),
    Validation(String),
    /// The chain collaborator failed or reverted.
    Chain(String),
    /// The local store refused the write.
    Unavailable(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MissingSession => write!(f, "Missing {} header", SESSION_HEADER),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Chain(msg) => write!(f, "Chain error: {}", msg),
            AppError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MissingSession => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Chain(_) => StatusCode::BAD_GATEWAY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::MissingSession => ErrorResponse::bad_request(format!(
                "The {} header is required for this request",
                SESSION_HEADER
            ))
            .with_type("missing-session"),
            AppError::Unauthorized(detail) => {
                ErrorResponse::unauthorized(detail).with_type("wallet-not-connected")
            }
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Validation(detail) => ErrorResponse::unprocessable(detail),
            AppError::Chain(detail) => ErrorResponse::bad_gateway(detail).with_type("chain"),
            AppError::Unavailable(detail) => {
                ErrorResponse::service_unavailable(detail).with_type("storage")
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from board errors
impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Validation(msg) => AppError::Validation(msg),
            BoardError::MissingIdentity => {
                AppError::Unauthorized("Connect a wallet to publish".to_string())
            }
            BoardError::PostNotFound { id } => AppError::NotFound(format!("Post {} not found", id)),
            BoardError::InvalidAmount(msg) => AppError::BadRequest(msg),
            BoardError::MissingDonationAddress => {
                AppError::Validation("Post has no donation address".to_string())
            }
            BoardError::Storage(e) => e.into(),
            BoardError::Chain(e) => e.into(),
            BoardError::Serialization(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QuotaExceeded { .. } => AppError::Unavailable(err.to_string()),
            StorageError::Unavailable(msg) | StorageError::Io(msg) => {
                tracing::error!("Storage error: {}", msg);
                AppError::Unavailable("Local store is unavailable".to_string())
            }
            StorageError::Serialization(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NotConnected => AppError::Unauthorized(err.to_string()),
            ChainError::Rejected | ChainError::NetworkMismatch { .. } => {
                AppError::Conflict(err.to_string())
            }
            ChainError::NotDeployed { .. } | ChainError::Reverted(_) | ChainError::Rpc(_) => {
                AppError::Chain(err.to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_status_codes() {
        let cases = [
            (BoardError::PostNotFound { id: 9 }, StatusCode::NOT_FOUND),
            (BoardError::Validation("title".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (BoardError::MissingIdentity, StatusCode::UNAUTHORIZED),
            (BoardError::InvalidAmount("0".into()), StatusCode::BAD_REQUEST),
            (
                BoardError::Storage(StorageError::QuotaExceeded {
                    needed: 10,
                    limit: 5,
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                BoardError::Chain(ChainError::NetworkMismatch {
                    expected: 84532,
                    actual: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                BoardError::Chain(ChainError::Reverted("0xabc".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }
}
