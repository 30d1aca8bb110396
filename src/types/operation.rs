//! Operation-related types for the wallet ledger
//!
//! This module defines the two balance-mutating operations and the
//! validated request the engine dispatches to the store.

use super::error::{LedgerError, LedgerResult};
use super::wallet::{Balance, WalletId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation types supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// Credit funds to a wallet
    ///
    /// Creates the wallet if it doesn't exist yet.
    Deposit,

    /// Debit funds from a wallet
    ///
    /// Requires an existing wallet holding at least the requested amount.
    Withdraw,
}

impl OperationType {
    /// Wire name of the operation
    pub const fn as_str(self) -> &'static str {
        match self {
            OperationType::Deposit => "DEPOSIT",
            OperationType::Withdraw => "WITHDRAW",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = LedgerError;

    /// Parse an operation name, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("deposit") {
            Ok(OperationType::Deposit)
        } else if s.eq_ignore_ascii_case("withdraw") {
            Ok(OperationType::Withdraw)
        } else {
            Err(LedgerError::invalid_operation(s))
        }
    }
}

/// Validated operation request
///
/// Transient value that only lives for one engine call. Constructing one
/// through [`OperationRequest::new`] or [`OperationRequest::parse`] guarantees
/// a strictly positive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRequest {
    /// Target wallet
    pub wallet: WalletId,

    /// Requested operation
    pub operation: OperationType,

    /// Amount in the smallest currency unit, always > 0
    pub amount: Balance,
}

impl OperationRequest {
    /// Build a request from an already-typed operation
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - if `amount` is zero or negative
    pub fn new(wallet: WalletId, operation: OperationType, amount: Balance) -> LedgerResult<Self> {
        Ok(OperationRequest {
            wallet,
            operation,
            amount: positive(amount)?,
        })
    }

    /// Build a request from raw caller input
    ///
    /// The amount is checked before the operation name, so a request that is
    /// wrong on both counts reports `InvalidAmount`.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - if `amount` is zero or negative
    /// * `LedgerError::InvalidOperation` - if `operation` is not deposit/withdraw
    pub fn parse(wallet: WalletId, operation: &str, amount: Balance) -> LedgerResult<Self> {
        let amount = positive(amount)?;
        let operation = operation.parse::<OperationType>()?;

        Ok(OperationRequest {
            wallet,
            operation,
            amount,
        })
    }
}

fn positive(amount: Balance) -> LedgerResult<Balance> {
    if amount <= 0 {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(amount)
}
