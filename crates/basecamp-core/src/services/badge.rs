//! First-post badge and registration lookups.
//!
//! Badge outcomes are reported, never propagated: a post that was published
//! stays published whatever the badge contract does.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::Address;
use crate::error::BoardResult;
use crate::ports::{BadgeRegistry, TxHash, TxStatus, WalletClient};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BadgeOutcome {
    AlreadyOwned,
    Claimed { tx: TxHash },
    Failed { reason: String },
}

pub struct BadgeService {
    badges: Arc<dyn BadgeRegistry>,
    wallet: Arc<dyn WalletClient>,
}

impl BadgeService {
    pub fn new(badges: Arc<dyn BadgeRegistry>, wallet: Arc<dyn WalletClient>) -> Self {
        Self { badges, wallet }
    }

    /// Claim the first-post badge for `address` unless it already has one.
    pub async fn reward_first_post(&self, address: &Address) -> BadgeOutcome {
        let outcome = self.try_reward(address).await;
        match &outcome {
            BadgeOutcome::Failed { reason } => {
                tracing::warn!(
                    address = %address.abbreviate(),
                    reason = %reason,
                    "Badge claim failed"
                );
            }
            other => {
                tracing::debug!(address = %address.abbreviate(), outcome = ?other, "Badge checked");
            }
        }
        outcome
    }

    async fn try_reward(&self, address: &Address) -> BadgeOutcome {
        match self.badges.has_first_post_badge(address).await {
            Ok(true) => return BadgeOutcome::AlreadyOwned,
            Ok(false) => {}
            Err(e) => {
                return BadgeOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }

        let tx = match self.badges.claim_first_post_badge().await {
            Ok(tx) => tx,
            Err(e) => {
                return BadgeOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match self.wallet.await_confirmation(&tx).await {
            Ok(TxStatus::Confirmed) => BadgeOutcome::Claimed { tx },
            Ok(TxStatus::Failed) => BadgeOutcome::Failed {
                reason: format!("claim transaction {} reverted", tx),
            },
            Err(e) => BadgeOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    pub async fn is_registered(&self, address: &Address) -> BoardResult<bool> {
        Ok(self.badges.is_registered(address).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::services::testing::{ScriptedBadges, ScriptedWallet, address};

    fn service(badges: Arc<ScriptedBadges>) -> BadgeService {
        BadgeService::new(badges, Arc::new(ScriptedWallet::connected(address('d'))))
    }

    #[tokio::test]
    async fn test_claims_once_then_already_owned() {
        let badges = Arc::new(ScriptedBadges::new(address('d')));
        let service = service(badges);

        assert!(matches!(
            service.reward_first_post(&address('d')).await,
            BadgeOutcome::Claimed { .. }
        ));
        assert_eq!(
            service.reward_first_post(&address('d')).await,
            BadgeOutcome::AlreadyOwned
        );
    }

    #[tokio::test]
    async fn test_contract_failure_is_reported() {
        let badges = Arc::new(ScriptedBadges::new(address('d')));
        badges.broken.store(true, Ordering::SeqCst);

        let outcome = service(badges).reward_first_post(&address('d')).await;
        assert!(matches!(outcome, BadgeOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_is_registered() {
        let mut badges = ScriptedBadges::new(address('d'));
        badges.registered.insert(address('e'));
        let service = service(Arc::new(badges));

        assert!(service.is_registered(&address('e')).await.unwrap());
        assert!(!service.is_registered(&address('d')).await.unwrap());
    }
}
