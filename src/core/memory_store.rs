//! Thread-safe in-memory ledger store
//!
//! This module provides the `MemoryLedgerStore` struct, which keeps wallet
//! balances in a concurrent map. It backs tests, benchmarks and the
//! `--store memory` mode of the binary; balances do not survive a restart.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) for fine-grained locking.
//! A `RefMut` guard on a wallet's entry is an exclusive lock on that wallet,
//! so every read-check-write sequence runs while the guard is held. Different
//! wallets usually live in different shards and don't block each other.
//!
//! # Cancellation
//!
//! No method awaits while holding a guard. A dropped call therefore either
//! never took the guard or already finished its write, and no partially
//! applied change can be observed.

use crate::core::traits::LedgerStore;
use crate::types::{Balance, LedgerError, LedgerResult, Wallet, WalletId};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::trace;

/// Thread-safe in-memory balance store
///
/// All methods are safe to call from multiple tasks concurrently:
/// - Operations on different wallets don't block each other
/// - Operations on the same wallet are serialized by the entry guard
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    /// Balances by wallet ID
    wallets: DashMap<WalletId, Balance>,
}

impl MemoryLedgerStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Number of wallets created so far
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether no wallet has been created yet
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Get all wallets
    ///
    /// The snapshot is taken shard by shard; wallets may change while it is
    /// being collected, but every individual balance is a committed value.
    pub fn snapshot(&self) -> Vec<Wallet> {
        self.wallets
            .iter()
            .map(|entry| Wallet::new(*entry.key(), *entry.value()))
            .collect()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_balance(&self, wallet: WalletId) -> LedgerResult<Balance> {
        self.wallets
            .get(&wallet)
            .map(|balance| *balance)
            .ok_or_else(|| LedgerError::wallet_not_found(wallet))
    }

    async fn deposit(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance> {
        let mut balance = self.wallets.entry(wallet).or_insert(0);

        // Only an existing wallet can overflow; leave it untouched if it does
        let updated = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::storage(format!("balance overflow for wallet {wallet}")))?;
        *balance = updated;

        trace!(wallet = %wallet, amount, balance = updated, "deposit applied");
        Ok(updated)
    }

    async fn withdraw(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance> {
        let mut balance = self
            .wallets
            .get_mut(&wallet)
            .ok_or_else(|| LedgerError::wallet_not_found(wallet))?;

        if *balance < amount {
            return Err(LedgerError::insufficient_funds(wallet, *balance, amount));
        }
        *balance -= amount;

        trace!(wallet = %wallet, amount, balance = *balance, "withdrawal applied");
        Ok(*balance)
    }
}
