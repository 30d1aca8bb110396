//! Wallet-related types for the wallet ledger
//!
//! This module defines the identifiers and the balance snapshot used by the
//! store, the engine and the HTTP gateway.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wallet identifier
///
/// Caller-supplied 128-bit UUID. The ledger never generates identifiers:
/// a wallet comes into existence the first time a deposit names it.
pub type WalletId = Uuid;

/// Balance in the smallest currency unit
///
/// Stored as a signed 64-bit integer to match the `BIGINT` column of the
/// PostgreSQL store, but a committed balance is never negative.
pub type Balance = i64;

/// Snapshot of a wallet's state
///
/// Returned by the gateway as the response body of both endpoints and by
/// [`MemoryLedgerStore::snapshot`](crate::core::MemoryLedgerStore::snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// The wallet identifier
    #[serde(rename = "walletId")]
    pub id: WalletId,

    /// Current balance after the last committed operation
    pub balance: Balance,
}

impl Wallet {
    /// Create a wallet snapshot
    pub fn new(id: WalletId, balance: Balance) -> Self {
        Wallet { id, balance }
    }
}
