//! Chain collaborator ports - wallet and pre-deployed contracts.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// Handle of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Confirmed,
    Failed,
}

/// Connected wallet - thin wrapper over an external chain client.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Address of the connected account, if any.
    async fn current_address(&self) -> Option<Address>;

    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Transfer `amount_wei` to `to`.
    async fn send_value(&self, to: &Address, amount_wei: u128) -> Result<TxHash, ChainError>;

    /// Wait until the transaction is mined.
    async fn await_confirmation(&self, tx: &TxHash) -> Result<TxStatus, ChainError>;
}

/// Badge and registration contracts.
#[async_trait]
pub trait BadgeRegistry: Send + Sync {
    async fn has_first_post_badge(&self, address: &Address) -> Result<bool, ChainError>;

    /// Claim the first-post badge for the connected account.
    async fn claim_first_post_badge(&self) -> Result<TxHash, ChainError>;

    async fn is_registered(&self, address: &Address) -> Result<bool, ChainError>;
}

/// Chain collaborator errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Transaction rejected by the user")]
    Rejected,

    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("Contract not deployed on chain {chain_id}")]
    NotDeployed { chain_id: u64 },

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}
