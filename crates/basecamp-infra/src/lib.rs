//! # Base Camp Infrastructure
//!
//! Concrete implementations of the ports defined in `basecamp-core`.
//! This crate contains the storage backends and the development chain client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store only
//! - `file-store` - Durable JSON-file store with atomic replace
//! - `dev-chain` - Simulated wallet, badge and registry contracts

pub mod chain;
pub mod storage;

// Re-exports - In-Memory
pub use storage::{InMemoryStore, ScopedStore, SessionScope, SessionStore};

#[cfg(feature = "file-store")]
pub use storage::FileStore;

#[cfg(feature = "dev-chain")]
pub use chain::{DevChain, DevChainConfig};
