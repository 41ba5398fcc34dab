//! Application state - shared across all handlers.

use std::sync::Arc;

use basecamp_core::ports::{BadgeRegistry, KeyValueStore, WalletClient};
use basecamp_core::services::{
    BadgeService, Board, DonationService, PostComposer, ViewCounter, VoteTracker,
};
use basecamp_infra::{InMemoryStore, ScopedStore, SessionStore};

use crate::config::{AppConfig, ChainConfig};
use crate::middleware::session::Session;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Board>,
    /// Local store: the post collection and per-viewer votes.
    pub storage: Arc<dyn KeyValueStore>,
    /// View flags per session, bounded and never written to disk.
    pub sessions: Arc<SessionStore>,
    pub wallet: Arc<dyn WalletClient>,
    pub badges: Arc<dyn BadgeRegistry>,
    pub chain_id: u64,
    pub persistent: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (storage, persistent) = open_storage(config).await;
        let (wallet, badges) = connect_chain(&config.chain);

        tracing::info!(
            persistent,
            chain_id = config.chain.chain_id,
            page_size = config.board.page_size,
            session_capacity = config.sessions.capacity,
            "Application state initialized"
        );

        Self::from_parts(storage, persistent, wallet, badges, config)
    }

    pub fn from_parts(
        storage: Arc<dyn KeyValueStore>,
        persistent: bool,
        wallet: Arc<dyn WalletClient>,
        badges: Arc<dyn BadgeRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self {
            board: Arc::new(Board::new(storage.clone(), config.board.clone())),
            storage,
            sessions: Arc::new(SessionStore::new(
                config.sessions.capacity,
                config.sessions.idle,
            )),
            wallet,
            badges,
            chain_id: config.chain.chain_id,
            persistent,
        }
    }

    /// Votes of the viewer behind `session`.
    ///
    /// Anonymous requests get a throwaway store, so they see no vote state.
    pub fn votes(&self, session: Option<&Session>) -> VoteTracker {
        let store: Arc<dyn KeyValueStore> = match session {
            Some(session) => Arc::new(ScopedStore::new(
                self.storage.clone(),
                &format!("viewer:{}", session.id()),
            )),
            None => Arc::new(InMemoryStore::new()),
        };
        self.board.vote_tracker(store)
    }

    pub fn views(&self, session: &Session) -> ViewCounter {
        self.board.view_counter(Arc::new(self.sessions.scope(session.id())))
    }

    pub fn composer(&self) -> PostComposer {
        self.board.composer(self.wallet.clone())
    }

    pub fn donations(&self) -> DonationService {
        DonationService::new(self.wallet.clone()).with_expected_chain(self.chain_id)
    }

    pub fn badge_service(&self) -> BadgeService {
        BadgeService::new(self.badges.clone(), self.wallet.clone())
    }
}

/// Chain collaborator used when built without the development chain.
#[cfg(not(feature = "dev-chain"))]
mod offline {
    use async_trait::async_trait;

    use basecamp_core::domain::Address;
    use basecamp_core::ports::{BadgeRegistry, ChainError, TxHash, TxStatus, WalletClient};

    pub struct OfflineChain {
        pub chain_id: u64,
    }

    #[async_trait]
    impl WalletClient for OfflineChain {
        async fn current_address(&self) -> Option<Address> {
            None
        }

        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(self.chain_id)
        }

        async fn send_value(&self, _to: &Address, _amount_wei: u128) -> Result<TxHash, ChainError> {
            Err(ChainError::NotConnected)
        }

        async fn await_confirmation(&self, _tx: &TxHash) -> Result<TxStatus, ChainError> {
            Err(ChainError::NotConnected)
        }
    }

    #[async_trait]
    impl BadgeRegistry for OfflineChain {
        async fn has_first_post_badge(&self, _address: &Address) -> Result<bool, ChainError> {
            Err(ChainError::NotConnected)
        }

        async fn claim_first_post_badge(&self) -> Result<TxHash, ChainError> {
            Err(ChainError::NotConnected)
        }

        async fn is_registered(&self, _address: &Address) -> Result<bool, ChainError> {
            Err(ChainError::NotConnected)
        }
    }
}

#[cfg(feature = "file-store")]
async fn open_storage(config: &AppConfig) -> (Arc<dyn KeyValueStore>, bool) {
    use basecamp_infra::FileStore;

    match &config.data_path {
        Some(path) => match FileStore::open(path).await {
            Ok(store) => (Arc::new(store), true),
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to open board data file. Using in-memory fallback."
                );
                (memory_store(config.storage_quota), false)
            }
        },
        None => {
            tracing::warn!(
                "BOARD_DATA_PATH not set. Running without persistence (in-memory mode)."
            );
            (memory_store(config.storage_quota), false)
        }
    }
}

#[cfg(not(feature = "file-store"))]
async fn open_storage(config: &AppConfig) -> (Arc<dyn KeyValueStore>, bool) {
    if config.data_path.is_some() {
        tracing::warn!("Built without file-store feature - BOARD_DATA_PATH is ignored");
    }
    (memory_store(config.storage_quota), false)
}

/// In-memory local store, capped at `BOARD_STORAGE_QUOTA` bytes when set.
fn memory_store(quota: Option<usize>) -> Arc<dyn KeyValueStore> {
    match quota {
        Some(quota) => Arc::new(InMemoryStore::with_quota(quota)),
        None => Arc::new(InMemoryStore::new()),
    }
}

#[cfg(feature = "dev-chain")]
fn connect_chain(config: &ChainConfig) -> (Arc<dyn WalletClient>, Arc<dyn BadgeRegistry>) {
    use basecamp_infra::{DevChain, DevChainConfig};

    let chain = Arc::new(DevChain::new(DevChainConfig {
        chain_id: config.chain_id,
        account: config.wallet_address.clone(),
        badge_contract: config.badge_contract.clone(),
        ..Default::default()
    }));
    (chain.clone(), chain)
}

#[cfg(not(feature = "dev-chain"))]
fn connect_chain(config: &ChainConfig) -> (Arc<dyn WalletClient>, Arc<dyn BadgeRegistry>) {
    tracing::info!("Running without dev-chain feature - wallet is offline");
    let chain = Arc::new(offline::OfflineChain {
        chain_id: config.chain_id,
    });
    (chain.clone(), chain)
}
