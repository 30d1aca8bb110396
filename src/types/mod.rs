//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `wallet`: Wallet identifiers, balances and snapshots
//! - `operation`: Operation kinds and validated requests
//! - `error`: Error types for the wallet ledger

pub mod error;
pub mod operation;
pub mod wallet;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use operation::{OperationRequest, OperationType};
pub use wallet::{Balance, Wallet, WalletId};
