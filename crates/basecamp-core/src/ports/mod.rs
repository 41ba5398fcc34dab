//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod chain;
mod storage;

pub use chain::{BadgeRegistry, ChainError, TxHash, TxStatus, WalletClient};
pub use storage::{KeyValueStore, StorageError};
