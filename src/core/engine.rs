//! Operation engine
//!
//! This module provides the `OperationEngine` struct, the single contract the
//! gateway calls against. It validates a request, dispatches it to the
//! matching [`LedgerStore`] primitive and hands the store's outcome back
//! unchanged.
//!
//! # Design
//!
//! ```text
//! OperationEngine
//!     ├── EngineConfig (call_timeout)
//!     └── Arc<dyn LedgerStore>
//!         ├── PostgresLedgerStore (durable, row locks)
//!         └── MemoryLedgerStore   (DashMap, per-entry guards)
//! ```
//!
//! The engine holds no wallet state and never retries. All consistency
//! guarantees live in the store.
//!
//! # Deadlines and Cancellation
//!
//! Every store call is bounded by the configured `call_timeout` and may also
//! race a caller-supplied [`CancellationToken`]. When either fires first the
//! store future is dropped and its connection goes back to the pool.
//!
//! A store call is atomic, so it is applied completely or not at all, but
//! `DeadlineExceeded` and `Cancelled` do not say which. A withdrawal dropped
//! before `COMMIT` was sent is rolled back. One dropped while the commit (or
//! the single-statement deposit) is in flight may already be durable. Callers
//! that need to know read the balance again.

use crate::core::traits::LedgerStore;
use crate::types::{
    Balance, ErrorKind, LedgerError, LedgerResult, OperationRequest, OperationType, WalletId,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Engine configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for a single store call; `None` disables the deadline
    pub call_timeout: Option<Duration>,
}

impl EngineConfig {
    /// Default deadline for a store call
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

    /// Build a config from a millisecond value, where 0 disables the deadline
    pub fn from_millis(call_timeout_ms: u64) -> Self {
        Self {
            call_timeout: (call_timeout_ms > 0).then(|| Duration::from_millis(call_timeout_ms)),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(Self::DEFAULT_CALL_TIMEOUT),
        }
    }
}

/// Validation and dispatch layer between the gateway and the store
///
/// Cloning is cheap and clones share the same store.
#[derive(Clone)]
pub struct OperationEngine {
    store: Arc<dyn LedgerStore>,
    config: EngineConfig,
}

impl fmt::Debug for OperationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OperationEngine {
    /// Create an engine with the default configuration
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(store: Arc<dyn LedgerStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Apply a deposit or withdrawal
    ///
    /// # Arguments
    ///
    /// * `wallet` - Target wallet
    /// * `operation` - `deposit` or `withdraw`, ASCII case-insensitive
    /// * `amount` - Strictly positive amount in the smallest currency unit
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The wallet's balance after the operation
    /// * `Err(LedgerError::InvalidAmount)` - `amount <= 0`, store not contacted
    /// * `Err(LedgerError::InvalidOperation)` - unknown operation, store not contacted
    /// * `Err(LedgerError::WalletNotFound)` - withdrawal from an unknown wallet
    /// * `Err(LedgerError::InsufficientFunds)` - withdrawal above the balance
    /// * `Err(_)` - an infrastructure failure, nothing committed
    pub async fn operate(
        &self,
        wallet: WalletId,
        operation: &str,
        amount: Balance,
    ) -> LedgerResult<Balance> {
        let request = self.validate(wallet, operation, amount)?;
        self.execute(request, None).await
    }

    /// Same as [`operate`](Self::operate), abandoned when `cancel` fires
    pub async fn operate_with_cancel(
        &self,
        wallet: WalletId,
        operation: &str,
        amount: Balance,
        cancel: &CancellationToken,
    ) -> LedgerResult<Balance> {
        let request = self.validate(wallet, operation, amount)?;
        self.execute(request, Some(cancel)).await
    }

    /// Apply an already-validated request
    pub async fn operate_request(&self, request: OperationRequest) -> LedgerResult<Balance> {
        self.execute(request, None).await
    }

    /// Current balance of a wallet
    ///
    /// Fails with `WalletNotFound` if the wallet has never received a deposit.
    pub async fn balance(&self, wallet: WalletId) -> LedgerResult<Balance> {
        self.query_balance(wallet, None).await
    }

    /// Same as [`balance`](Self::balance), abandoned when `cancel` fires
    pub async fn balance_with_cancel(
        &self,
        wallet: WalletId,
        cancel: &CancellationToken,
    ) -> LedgerResult<Balance> {
        self.query_balance(wallet, Some(cancel)).await
    }

    fn validate(
        &self,
        wallet: WalletId,
        operation: &str,
        amount: Balance,
    ) -> LedgerResult<OperationRequest> {
        OperationRequest::parse(wallet, operation, amount).map_err(|err| {
            debug!(wallet = %wallet, operation, amount, error = %err, "request rejected");
            err
        })
    }

    async fn execute(
        &self,
        request: OperationRequest,
        cancel: Option<&CancellationToken>,
    ) -> LedgerResult<Balance> {
        let OperationRequest {
            wallet,
            operation,
            amount,
        } = request;

        let call = async {
            match operation {
                OperationType::Deposit => self.store.deposit(wallet, amount).await,
                OperationType::Withdraw => self.store.withdraw(wallet, amount).await,
            }
        };
        let result = self.bounded(call, cancel).await;

        match &result {
            Ok(balance) => {
                info!(wallet = %wallet, %operation, amount, balance, "operation applied")
            }
            Err(err) => log_failure(wallet, operation.as_str(), err),
        }
        result
    }

    async fn query_balance(
        &self,
        wallet: WalletId,
        cancel: Option<&CancellationToken>,
    ) -> LedgerResult<Balance> {
        let result = self.bounded(self.store.get_balance(wallet), cancel).await;

        match &result {
            Ok(balance) => debug!(wallet = %wallet, balance, "balance read"),
            Err(err) => log_failure(wallet, "BALANCE", err),
        }
        result
    }

    /// Run a store call under the configured deadline and optional cancellation
    async fn bounded<T, F>(&self, call: F, cancel: Option<&CancellationToken>) -> LedgerResult<T>
    where
        F: Future<Output = LedgerResult<T>>,
    {
        let deadline = async {
            match self.config.call_timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(LedgerError::DeadlineExceeded),
                },
                None => call.await,
            }
        };

        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(LedgerError::Cancelled),
                result = deadline => result,
            },
            None => deadline.await,
        }
    }
}

fn log_failure(wallet: WalletId, operation: &str, err: &LedgerError) {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Domain => {
            info!(wallet = %wallet, operation, error = %err, "operation refused")
        }
        ErrorKind::Infrastructure => error!(
            wallet = %wallet,
            operation,
            error = %err,
            detail = err.detail().unwrap_or_default(),
            "operation failed"
        ),
    }
}
