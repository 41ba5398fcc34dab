//! Session extractors.
//!
//! A session is an opaque id chosen by the client and sent in the
//! `X-Board-Session` header. It scopes view flags and votes; it is not
//! an authentication mechanism.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use super::error::AppError;

pub const SESSION_HEADER: &str = "X-Board-Session";

const MAX_SESSION_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    /// Accepts 1..=128 ASCII alphanumerics, `-` and `_`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id = raw.trim();
        let valid = !id.is_empty()
            && id.len() <= MAX_SESSION_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::BadRequest(format!("Malformed {} header", SESSION_HEADER)))
        }
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    fn from_headers(req: &HttpRequest) -> Option<Result<Self, AppError>> {
        let value = req.headers().get(SESSION_HEADER)?;
        Some(match value.to_str() {
            Ok(raw) => Self::parse(raw),
            Err(_) => Err(AppError::BadRequest(format!(
                "Malformed {} header",
                SESSION_HEADER
            ))),
        })
    }
}

/// Required session - rejects the request when the header is absent.
impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Session::from_headers(req).unwrap_or(Err(AppError::MissingSession)))
    }
}

/// Optional session extractor - doesn't fail if the header is absent.
pub struct OptionalSession(pub Option<Session>);

impl FromRequest for OptionalSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Session::from_headers(req).transpose().map(OptionalSession))
    }
}
