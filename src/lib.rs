//! Wallet Ledger Library
//! # Overview
//!
//! This library keeps integer wallet balances and applies deposits and
//! withdrawals to them without ever letting a balance go negative or losing
//! an update under concurrent access.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (WalletId, OperationType, LedgerError, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Request validation and dispatch
//!   - [`core::postgres_store`] - Durable store with row-level locking
//!   - [`core::memory_store`] - Concurrent in-memory store
//! - [`gateway`] - HTTP adapter (axum)
//! - [`cli`] - CLI/environment configuration
//! - [`logging`] - Tracing subscriber setup
//!
//! # Operations
//!
//! - **Deposit**: Credit funds to a wallet, creating it on first use
//! - **Withdraw**: Debit funds from an existing wallet (requires sufficient balance)
//! - **Balance**: Read a wallet's current balance
//!
//! # Errors
//!
//! Every failure is a [`LedgerError`]:
//! - `InvalidAmount` / `InvalidOperation`: rejected before the store is contacted
//! - `WalletNotFound` / `InsufficientFunds`: business outcomes from the store
//! - `Storage` / `DeadlineExceeded` / `Cancelled`: opaque infrastructure failures

pub mod cli;
pub mod core;
pub mod gateway;
pub mod logging;
pub mod types;

pub use core::{
    EngineConfig, LedgerStore, MemoryLedgerStore, OperationEngine, PoolConfig,
    PostgresLedgerStore,
};
pub use types::{
    Balance, ErrorKind, LedgerError, LedgerResult, OperationRequest, OperationType, Wallet,
    WalletId,
};
