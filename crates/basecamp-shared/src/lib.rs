//! # Base Camp Shared
//!
//! Wire types for the board HTTP API.
//! Kept apart from the server so that a client can depend on them alone.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
