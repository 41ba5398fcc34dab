//! Per-network contract deployments.

use super::Address;
use crate::ports::ChainError;

pub const BASE_MAINNET: u64 = 8453;
pub const BASE_SEPOLIA: u64 = 84532;
pub const LOCAL_LEGACY: u64 = 1337;
pub const LOCAL_HARDHAT: u64 = 31337;

/// Deployed address of one contract on each supported network.
///
/// An empty entry means "not deployed on that network".
#[derive(Debug, Clone, Default)]
pub struct Deployments {
    pub mainnet: Option<Address>,
    pub sepolia: Option<Address>,
    pub local: Option<Address>,
}

impl Deployments {
    /// Resolve the contract address for `chain_id`.
    ///
    /// Local development chains use the local deployment, and so do unknown
    /// chains.
    pub fn resolve(&self, chain_id: u64) -> Result<Address, ChainError> {
        let slot = match chain_id {
            BASE_MAINNET => &self.mainnet,
            BASE_SEPOLIA => &self.sepolia,
            LOCAL_LEGACY | LOCAL_HARDHAT => &self.local,
            other => {
                tracing::debug!(chain_id = other, "Unknown chain, using local deployment");
                &self.local
            }
        };
        slot.clone().ok_or(ChainError::NotDeployed { chain_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Address {
        Address::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()
    }

    #[test]
    fn test_unknown_chain_uses_local() {
        let deployments = Deployments {
            local: Some(local()),
            ..Default::default()
        };
        assert_eq!(deployments.resolve(LOCAL_HARDHAT).unwrap(), local());
        assert_eq!(deployments.resolve(LOCAL_LEGACY).unwrap(), local());
        assert_eq!(deployments.resolve(999).unwrap(), local());
    }

    #[test]
    fn test_missing_deployment_is_error() {
        let deployments = Deployments {
            local: Some(local()),
            ..Default::default()
        };
        assert!(matches!(
            deployments.resolve(BASE_SEPOLIA),
            Err(ChainError::NotDeployed {
                chain_id: BASE_SEPOLIA
            })
        ));
    }
}
