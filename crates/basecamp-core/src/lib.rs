//! # Base Camp Core
//!
//! The board data layer of Base Camp.
//! Posts, votes, session view counts, filtering/sorting and post composition,
//! with persistence and chain access behind ports so any backend can be plugged in.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{BoardError, BoardResult};
