//! Core business logic module
//!
//! This module contains the balance-mutation components:
//! - `traits` - The `LedgerStore` abstraction
//! - `engine` - Request validation and dispatch
//! - `memory_store` - DashMap-backed store for tests and local runs
//! - `postgres_store` - Durable store with row-level locking

pub mod engine;
pub mod memory_store;
pub mod postgres_store;
pub mod traits;

pub use engine::{EngineConfig, OperationEngine};
pub use memory_store::MemoryLedgerStore;
pub use postgres_store::{PoolConfig, PostgresLedgerStore};
pub use traits::LedgerStore;
