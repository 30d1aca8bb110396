//! Error types for the wallet ledger
//!
//! This module defines every failure the ledger core can return to its caller.
//!
//! # Error Categories
//!
//! - **Validation**: the caller sent an amount or operation type the ledger
//!   does not accept. Detected before any store access.
//! - **Domain**: business-rule outcomes (`WalletNotFound`, `InsufficientFunds`).
//!   Surfaced verbatim and never retried.
//! - **Infrastructure**: storage trouble, elapsed deadlines and cancellation.
//!   The rendered message is generic; the underlying detail is
//!   only available through [`LedgerError::detail`] for logging.

use super::wallet::{Balance, WalletId};
use thiserror::Error;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Broad classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller mistake, rejected before touching the store
    Validation,
    /// Business-rule outcome reported by the store
    Domain,
    /// Opaque failure of the storage layer or of the call itself
    Infrastructure,
}

/// Main error type for the wallet ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is zero or negative
    #[error("amount must be positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Balance,
    },

    /// Operation type is neither deposit nor withdraw
    #[error("invalid operation type '{operation}'")]
    InvalidOperation {
        /// The rejected operation text, as received
        operation: String,
    },

    /// No wallet exists for the identifier
    ///
    /// Returned by balance queries and withdrawals. Deposits never return it
    /// because they create the wallet.
    #[error("wallet {wallet} not found")]
    WalletNotFound {
        /// The unknown wallet
        wallet: WalletId,
    },

    /// Withdrawal would take the balance below zero
    ///
    /// The wallet is left untouched.
    #[error("not enough funds in wallet {wallet}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The wallet being debited
        wallet: WalletId,
        /// Balance observed under the wallet lock
        balance: Balance,
        /// Requested withdrawal amount
        requested: Balance,
    },

    /// The storage layer failed
    ///
    /// `detail` carries the underlying cause for logs and is never part of
    /// the rendered message.
    #[error("internal storage error")]
    Storage {
        /// Underlying cause, for logging only
        detail: String,
    },

    /// The call's deadline elapsed before the store answered
    ///
    /// The operation may or may not have been committed.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// The caller cancelled the call before the store answered
    ///
    /// The operation may or may not have been committed.
    #[error("operation cancelled")]
    Cancelled,
}

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Balance) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(operation: &str) -> Self {
        LedgerError::InvalidOperation {
            operation: operation.to_string(),
        }
    }

    /// Create a WalletNotFound error
    pub fn wallet_not_found(wallet: WalletId) -> Self {
        LedgerError::WalletNotFound { wallet }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(wallet: WalletId, balance: Balance, requested: Balance) -> Self {
        LedgerError::InsufficientFunds {
            wallet,
            balance,
            requested,
        }
    }

    /// Create a Storage error
    pub fn storage(detail: impl Into<String>) -> Self {
        LedgerError::Storage {
            detail: detail.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount { .. } | LedgerError::InvalidOperation { .. } => {
                ErrorKind::Validation
            }
            LedgerError::WalletNotFound { .. } | LedgerError::InsufficientFunds { .. } => {
                ErrorKind::Domain
            }
            LedgerError::Storage { .. }
            | LedgerError::DeadlineExceeded
            | LedgerError::Cancelled => ErrorKind::Infrastructure,
        }
    }

    /// Whether this is an infrastructure failure rather than a business outcome
    pub fn is_infrastructure(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }

    /// Underlying storage detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            LedgerError::Storage { detail } => Some(detail),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(error: sqlx::Error) -> Self {
        LedgerError::storage(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        LedgerError::storage(format!("migration failed: {}", error))
    }
}
