//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use basecamp_core::domain::Address;
use basecamp_core::domain::network::{BASE_SEPOLIA, Deployments};
use basecamp_core::services::BoardConfig;
use basecamp_infra::storage::{DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// File backing the local store; `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
    /// Byte limit of the in-memory store used when there is no data file.
    pub storage_quota: Option<usize>,
    pub board: BoardConfig,
    pub sessions: SessionConfig,
    pub chain: ChainConfig,
}

/// Limits of the in-memory session table.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capacity: usize,
    pub idle: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SESSION_CAPACITY,
            idle: DEFAULT_SESSION_IDLE,
        }
    }
}

/// Wallet and contract settings for the chain collaborator.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Account the wallet reports as connected.
    pub wallet_address: Option<Address>,
    pub chain_id: u64,
    pub badge_contract: Deployments,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut board = BoardConfig::default();
        if let Some(page_size) = parse_var::<usize>("BOARD_PAGE_SIZE").filter(|n| *n > 0) {
            board.page_size = page_size;
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            data_path: env::var("BOARD_DATA_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            storage_quota: parse_var::<usize>("BOARD_STORAGE_QUOTA").filter(|n| *n > 0),
            board,
            sessions: SessionConfig::from_env(),
            chain: ChainConfig::from_env(),
        }
    }
}

impl SessionConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var::<usize>("SESSION_CAPACITY")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.capacity),
            idle: parse_var::<u64>("SESSION_IDLE_SECS")
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle),
        }
    }
}

impl ChainConfig {
    fn from_env() -> Self {
        Self {
            wallet_address: address_var("WALLET_ADDRESS"),
            chain_id: parse_var("CHAIN_ID").unwrap_or(BASE_SEPOLIA),
            badge_contract: Deployments {
                mainnet: address_var("BADGE_CONTRACT_MAINNET"),
                sepolia: address_var("BADGE_CONTRACT_SEPOLIA"),
                local: address_var("BADGE_CONTRACT_LOCAL"),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Unset or blank is `None`; a malformed address is logged and ignored.
fn address_var(name: &str) -> Option<Address> {
    let raw = env::var(name).ok().filter(|v| !v.trim().is_empty())?;
    match Address::parse(raw.trim()) {
        Ok(address) => Some(address),
        Err(e) => {
            tracing::warn!(var = name, error = %e, "Ignoring malformed address");
            None
        }
    }
}
