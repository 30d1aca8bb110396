//! Core trait for balance storage
//!
//! This module defines the storage abstraction that lets the engine run
//! against either the PostgreSQL store or the in-memory store.

use crate::types::{Balance, LedgerResult, WalletId};
use async_trait::async_trait;

/// Trait for durable, concurrency-safe balance storage
///
/// The store is the sole owner of wallet state. Every method is a single
/// atomic unit: a failure or a dropped future leaves no partial write behind.
/// Callers are expected to pass strictly positive amounts; the engine
/// validates before it gets here.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Point read of a wallet's committed balance
    ///
    /// Fails with `WalletNotFound` if no wallet exists for `wallet`.
    async fn get_balance(&self, wallet: WalletId) -> LedgerResult<Balance>;

    /// Credit `amount`, creating the wallet if it doesn't exist
    ///
    /// Must be a single atomic upsert-increment so that concurrent deposits
    /// to the same wallet are all reflected. Returns the balance after
    /// this deposit.
    async fn deposit(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance>;

    /// Debit `amount` under an exclusive per-wallet lock
    ///
    /// Fails with `WalletNotFound` if the wallet doesn't exist and with
    /// `InsufficientFunds` if its balance is below `amount`. The read, the
    /// check and the write happen under the same lock, so concurrent
    /// withdrawals never both succeed against a stale balance.
    async fn withdraw(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance>;
}
