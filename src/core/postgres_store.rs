//! PostgreSQL ledger store
//!
//! Durable implementation of [`LedgerStore`] on top of a `sqlx` connection
//! pool. Wallets live in a single `wallets(id UUID, balance BIGINT)` table
//! created by the migrations in `migrations/`.
//!
//! # Concurrency
//!
//! - Deposits are one `INSERT ... ON CONFLICT DO UPDATE` statement. The
//!   increment is evaluated by the database against the row it locks, so
//!   concurrent deposits never lose an update.
//! - Withdrawals run in a transaction that takes the row lock with
//!   `SELECT ... FOR UPDATE`, checks the balance and writes the new value
//!   before committing. Other withdrawals and deposits on the same wallet
//!   wait for the lock; other wallets are unaffected.
//!
//! A transaction that is dropped before `commit` (early return, error, or
//! the caller cancelling the future) is rolled back by `sqlx`, and its
//! connection goes back to the pool.

use crate::core::traits::LedgerStore;
use crate::types::{Balance, LedgerError, LedgerResult, WalletId};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection pool configuration
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long a call may wait for a free connection
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    /// Default maximum connections: four per CPU core
    pub fn default_max_connections() -> u32 {
        (num_cpus::get() * 4) as u32
    }

    /// Default minimum connections
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

    /// Default acquire timeout
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a PoolConfig with defaults for everything but the URL
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::default_max_connections(),
            min_connections: Self::DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Create a PoolConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning, and the
    /// minimum is capped at the maximum.
    pub fn new(
        database_url: impl Into<String>,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Self {
        let default = Self::with_url(database_url);

        let max_connections = if max_connections == 0 {
            warn!(
                default = default.max_connections,
                "Invalid max_connections (0), using default"
            );
            default.max_connections
        } else {
            max_connections
        };

        let min_connections = if min_connections > max_connections {
            warn!(
                min_connections,
                max_connections, "min_connections exceeds max_connections, capping"
            );
            max_connections
        } else {
            min_connections
        };

        let acquire_timeout = if acquire_timeout.is_zero() {
            warn!(
                default_secs = default.acquire_timeout.as_secs(),
                "Invalid acquire_timeout (0), using default"
            );
            default.acquire_timeout
        } else {
            acquire_timeout
        };

        Self {
            max_connections,
            min_connections,
            acquire_timeout,
            ..default
        }
    }

    /// Connection URL with the password replaced, safe for logs
    pub fn database_url_masked(&self) -> String {
        let url = &self.database_url;
        let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
            return url.clone();
        };
        let Some(at) = url[scheme_end..].find('@').map(|i| i + scheme_end) else {
            return url.clone();
        };
        match url[scheme_end..at].find(':') {
            Some(colon) => format!("{}:***{}", &url[..scheme_end + colon], &url[at..]),
            None => url.clone(),
        }
    }
}

/// PostgreSQL-backed balance store
///
/// Cheap to clone: clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool
    pub async fn connect(config: &PoolConfig) -> LedgerResult<Self> {
        info!(url = %config.database_url_masked(), "Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Run pending schema migrations
    pub async fn migrate(&self) -> LedgerResult<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Whether the database answers a trivial query
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn get_balance(&self, wallet: WalletId) -> LedgerResult<Balance> {
        sqlx::query_scalar::<_, i64>("SELECT balance FROM wallets WHERE id = $1")
            .bind(wallet)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LedgerError::wallet_not_found(wallet))
    }

    async fn deposit(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance> {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO wallets (id, balance)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET balance = wallets.balance + EXCLUDED.balance
            RETURNING balance
            "#,
        )
        .bind(wallet)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        debug!(wallet = %wallet, amount, balance, "deposit committed");
        Ok(balance)
    }

    async fn withdraw(&self, wallet: WalletId, amount: Balance) -> LedgerResult<Balance> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit or rollback
        let current = sqlx::query_scalar::<_, i64>(
            "SELECT balance FROM wallets WHERE id = $1 FOR UPDATE",
        )
        .bind(wallet)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| LedgerError::wallet_not_found(wallet))?;

        if current < amount {
            return Err(LedgerError::insufficient_funds(wallet, current, amount));
        }

        let balance = sqlx::query_scalar::<_, i64>(
            "UPDATE wallets SET balance = $2 WHERE id = $1 RETURNING balance",
        )
        .bind(wallet)
        .bind(current - amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(wallet = %wallet, amount, balance, "withdrawal committed");
        Ok(balance)
    }
}
