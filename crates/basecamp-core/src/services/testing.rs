//! Test doubles for the ports.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::Address;
use crate::ports::{
    BadgeRegistry, ChainError, KeyValueStore, StorageError, TxHash, TxStatus, WalletClient,
};

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    pub fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded {
                needed: value.len(),
                limit: 0,
            });
        }
        self.put_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn address(byte: char) -> Address {
    Address::parse(&format!("0x{}", byte.to_string().repeat(40))).unwrap()
}

/// Wallet whose responses are set up by the test.
pub struct ScriptedWallet {
    pub address: Option<Address>,
    pub chain_id: u64,
    pub reject: AtomicBool,
    pub fail_confirmation: AtomicBool,
    pub sent: Mutex<Vec<(Address, u128)>>,
    counter: AtomicU64,
}

impl ScriptedWallet {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Self::disconnected()
        }
    }

    pub fn disconnected() -> Self {
        Self {
            address: None,
            chain_id: crate::domain::network::BASE_SEPOLIA,
            reject: AtomicBool::new(false),
            fail_confirmation: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
        }
    }

    fn next_hash(&self) -> TxHash {
        TxHash(format!("0x{:064x}", self.counter.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

#[async_trait]
impl WalletClient for ScriptedWallet {
    async fn current_address(&self) -> Option<Address> {
        self.address.clone()
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.chain_id)
    }

    async fn send_value(&self, to: &Address, amount_wei: u128) -> Result<TxHash, ChainError> {
        if self.address.is_none() {
            return Err(ChainError::NotConnected);
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(ChainError::Rejected);
        }
        self.sent.lock().unwrap().push((to.clone(), amount_wei));
        Ok(self.next_hash())
    }

    async fn await_confirmation(&self, _tx: &TxHash) -> Result<TxStatus, ChainError> {
        if self.fail_confirmation.load(Ordering::SeqCst) {
            Ok(TxStatus::Failed)
        } else {
            Ok(TxStatus::Confirmed)
        }
    }
}

/// Badge contract double: the connected account is `claimant`.
pub struct ScriptedBadges {
    pub claimant: Address,
    pub holders: Mutex<HashSet<Address>>,
    pub registered: HashSet<Address>,
    pub broken: AtomicBool,
}

impl ScriptedBadges {
    pub fn new(claimant: Address) -> Self {
        Self {
            claimant,
            holders: Mutex::new(HashSet::new()),
            registered: HashSet::new(),
            broken: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BadgeRegistry for ScriptedBadges {
    async fn has_first_post_badge(&self, address: &Address) -> Result<bool, ChainError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("connection refused".into()));
        }
        Ok(self.holders.lock().unwrap().contains(address))
    }

    async fn claim_first_post_badge(&self) -> Result<TxHash, ChainError> {
        self.holders.lock().unwrap().insert(self.claimant.clone());
        Ok(TxHash("0xbadge".into()))
    }

    async fn is_registered(&self, address: &Address) -> Result<bool, ChainError> {
        Ok(self.registered.contains(address))
    }
}
