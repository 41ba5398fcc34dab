//! Development chain - a simulated wallet and badge/registry contracts.
//!
//! Used when no real chain client is wired in. Transfers and claims are
//! recorded in memory and confirm after a configurable delay.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use basecamp_core::domain::Address;
use basecamp_core::domain::network::{BASE_SEPOLIA, Deployments};
use basecamp_core::ports::{BadgeRegistry, ChainError, TxHash, TxStatus, WalletClient};

/// Development chain configuration.
#[derive(Debug, Clone)]
pub struct DevChainConfig {
    pub chain_id: u64,
    /// Connected account; `None` behaves like a disconnected wallet.
    pub account: Option<Address>,
    pub badge_contract: Deployments,
    pub confirmation_delay: Duration,
}

impl Default for DevChainConfig {
    fn default() -> Self {
        Self {
            chain_id: BASE_SEPOLIA,
            account: None,
            badge_contract: Deployments::default(),
            confirmation_delay: Duration::ZERO,
        }
    }
}

/// A recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevTransaction {
    pub from: Address,
    pub to: Address,
    pub amount_wei: u128,
    pub status: TxStatus,
}

#[derive(Default)]
struct ChainState {
    transactions: HashMap<TxHash, DevTransaction>,
    badge_holders: HashSet<Address>,
    registered: HashSet<Address>,
    reject_next: bool,
}

pub struct DevChain {
    config: DevChainConfig,
    state: RwLock<ChainState>,
}

impl DevChain {
    pub fn new(config: DevChainConfig) -> Self {
        tracing::info!(
            chain_id = config.chain_id,
            connected = config.account.is_some(),
            "Development chain initialized"
        );
        Self {
            config,
            state: RwLock::new(ChainState::default()),
        }
    }

    /// Mark an account as registered with the wallet-auth contract.
    pub async fn register(&self, address: Address) {
        self.state.write().await.registered.insert(address);
    }

    /// Make the next transaction fail as if the user rejected it.
    pub async fn reject_next_transaction(&self) {
        self.state.write().await.reject_next = true;
    }

    pub async fn transaction(&self, tx: &TxHash) -> Option<DevTransaction> {
        self.state.read().await.transactions.get(tx).cloned()
    }

    fn account(&self) -> Result<&Address, ChainError> {
        self.config.account.as_ref().ok_or(ChainError::NotConnected)
    }

    fn badge_contract(&self) -> Result<Address, ChainError> {
        self.config.badge_contract.resolve(self.config.chain_id)
    }

    async fn submit(&self, to: Address, amount_wei: u128) -> Result<TxHash, ChainError> {
        let from = self.account()?.clone();
        let mut state = self.state.write().await;

        if std::mem::take(&mut state.reject_next) {
            return Err(ChainError::Rejected);
        }

        let tx = TxHash(format!(
            "0x{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ));
        state.transactions.insert(
            tx.clone(),
            DevTransaction {
                from,
                to,
                amount_wei,
                status: TxStatus::Confirmed,
            },
        );
        Ok(tx)
    }
}

#[async_trait]
impl WalletClient for DevChain {
    async fn current_address(&self) -> Option<Address> {
        self.config.account.clone()
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.config.chain_id)
    }

    async fn send_value(&self, to: &Address, amount_wei: u128) -> Result<TxHash, ChainError> {
        let tx = self.submit(to.clone(), amount_wei).await?;
        tracing::debug!(tx = %tx, to = %to.abbreviate(), amount_wei, "Transfer submitted");
        Ok(tx)
    }

    async fn await_confirmation(&self, tx: &TxHash) -> Result<TxStatus, ChainError> {
        if !self.config.confirmation_delay.is_zero() {
            tokio::time::sleep(self.config.confirmation_delay).await;
        }

        self.state
            .read()
            .await
            .transactions
            .get(tx)
            .map(|t| t.status)
            .ok_or_else(|| ChainError::Rpc(format!("unknown transaction {}", tx)))
    }
}

#[async_trait]
impl BadgeRegistry for DevChain {
    async fn has_first_post_badge(&self, address: &Address) -> Result<bool, ChainError> {
        self.badge_contract()?;
        Ok(self.state.read().await.badge_holders.contains(address))
    }

    async fn claim_first_post_badge(&self) -> Result<TxHash, ChainError> {
        let contract = self.badge_contract()?;
        let account = self.account()?.clone();

        if self.state.read().await.badge_holders.contains(&account) {
            return Err(ChainError::Reverted("badge already claimed".into()));
        }

        let tx = self.submit(contract, 0).await?;
        self.state.write().await.badge_holders.insert(account.clone());
        tracing::info!(tx = %tx, account = %account.abbreviate(), "First-post badge claimed");
        Ok(tx)
    }

    async fn is_registered(&self, address: &Address) -> Result<bool, ChainError> {
        Ok(self.state.read().await.registered.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
    }

    fn deployed() -> Deployments {
        Deployments {
            sepolia: Some(Address::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()),
            ..Default::default()
        }
    }

    fn connected() -> DevChain {
        DevChain::new(DevChainConfig {
            account: Some(account()),
            badge_contract: deployed(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_transfer_is_recorded_and_confirmed() {
        let chain = connected();
        let to = Address::parse("0x1234567890123456789012345678901234567890").unwrap();

        let tx = chain.send_value(&to, 42).await.unwrap();
        assert_eq!(tx.0.len(), 66);
        assert_eq!(chain.await_confirmation(&tx).await.unwrap(), TxStatus::Confirmed);
        assert_eq!(chain.transaction(&tx).await.unwrap().amount_wei, 42);
    }

    #[tokio::test]
    async fn test_disconnected_wallet() {
        let chain = DevChain::new(DevChainConfig::default());
        let to = account();
        assert_eq!(
            chain.send_value(&to, 1).await.unwrap_err(),
            ChainError::NotConnected
        );
    }

    #[tokio::test]
    async fn test_reject_next_transaction() {
        let chain = connected();
        chain.reject_next_transaction().await;
        let to = account();
        assert_eq!(chain.send_value(&to, 1).await.unwrap_err(), ChainError::Rejected);
        assert!(chain.send_value(&to, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_badge_claim_once() {
        let chain = connected();
        assert!(!chain.has_first_post_badge(&account()).await.unwrap());
        chain.claim_first_post_badge().await.unwrap();
        assert!(chain.has_first_post_badge(&account()).await.unwrap());
        assert!(matches!(
            chain.claim_first_post_badge().await,
            Err(ChainError::Reverted(_))
        ));
    }

    #[tokio::test]
    async fn test_badge_contract_not_deployed() {
        let chain = DevChain::new(DevChainConfig {
            account: Some(account()),
            ..Default::default()
        });
        assert_eq!(
            chain.has_first_post_badge(&account()).await.unwrap_err(),
            ChainError::NotDeployed {
                chain_id: BASE_SEPOLIA
            }
        );
    }

    #[tokio::test]
    async fn test_registration() {
        let chain = connected();
        assert!(!chain.is_registered(&account()).await.unwrap());
        chain.register(account()).await;
        assert!(chain.is_registered(&account()).await.unwrap());
    }
}
