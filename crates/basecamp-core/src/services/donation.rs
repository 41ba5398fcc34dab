//! Donations - value transfers from the connected wallet to a post's author.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Address, Post};
use crate::error::{BoardError, BoardResult};
use crate::ports::{ChainError, TxHash, TxStatus, WalletClient};

/// Amount pre-filled in the donation dialog.
pub const DEFAULT_DONATION_AMOUNT: &str = "0.01";

const ETH_DECIMALS: usize = 18;
const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Parse a decimal ETH amount into wei. The amount must be positive.
pub fn parse_ether(amount: &str) -> BoardResult<u128> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(BoardError::InvalidAmount("enter an amount".into()));
    }

    let invalid = || BoardError::InvalidAmount(format!("{:?} is not a valid ETH amount", amount));

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }
    if fraction.len() > ETH_DECIMALS {
        return Err(BoardError::InvalidAmount(format!(
            "at most {} decimal places are allowed",
            ETH_DECIMALS
        )));
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|w| w.checked_mul(WEI_PER_ETH))
            .ok_or_else(invalid)?
    };
    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = ETH_DECIMALS)
            .parse::<u128>()
            .map_err(|_| invalid())?
    };

    let wei = whole_wei.checked_add(fraction_wei).ok_or_else(invalid)?;
    if wei == 0 {
        return Err(BoardError::InvalidAmount(
            "amount must be greater than 0".into(),
        ));
    }
    Ok(wei)
}

/// A confirmed donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub tx_hash: TxHash,
    pub to: Address,
    pub amount_wei: u128,
}

pub struct DonationService {
    wallet: Arc<dyn WalletClient>,
    expected_chain: Option<u64>,
}

impl DonationService {
    pub fn new(wallet: Arc<dyn WalletClient>) -> Self {
        Self {
            wallet,
            expected_chain: None,
        }
    }

    /// Refuse to send unless the wallet is on `chain_id`.
    pub fn with_expected_chain(mut self, chain_id: u64) -> Self {
        self.expected_chain = Some(chain_id);
        self
    }

    /// Send `amount` ETH to the post's donation address and wait for it to be mined.
    pub async fn donate(&self, post: &Post, amount: &str) -> BoardResult<DonationReceipt> {
        let to = post
            .donation_target()
            .ok_or(BoardError::MissingDonationAddress)?;

        if self.wallet.current_address().await.is_none() {
            return Err(ChainError::NotConnected.into());
        }

        let amount_wei = parse_ether(amount)?;

        if let Some(expected) = self.expected_chain {
            let actual = self.wallet.chain_id().await?;
            if actual != expected {
                return Err(ChainError::NetworkMismatch { expected, actual }.into());
            }
        }

        let tx_hash = self.wallet.send_value(&to, amount_wei).await?;
        tracing::info!(post_id = post.id, tx = %tx_hash, to = %to, "Donation sent");

        match self.wallet.await_confirmation(&tx_hash).await? {
            TxStatus::Confirmed => Ok(DonationReceipt {
                tx_hash,
                to,
                amount_wei,
            }),
            TxStatus::Failed => {
                tracing::warn!(post_id = post.id, tx = %tx_hash, "Donation reverted");
                Err(ChainError::Reverted(tx_hash.0).into())
            }
        }
    }
}
