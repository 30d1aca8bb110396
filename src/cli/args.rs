use crate::core::{EngineConfig, PoolConfig};
use crate::gateway::GatewayConfig;
use crate::logging::LogFormat;
use clap::{Parser, ValueEnum};
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Wallet ledger HTTP service
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger", version)]
#[command(about = "Deposit, withdraw and query wallet balances over HTTP", long_about = None)]
pub struct CliArgs {
    /// Interface to bind
    #[arg(long, env = "LEDGER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = GatewayConfig::DEFAULT_PORT)]
    pub port: u16,

    /// Storage backend
    #[arg(
        long = "store",
        value_name = "STORE",
        env = "LEDGER_STORE",
        default_value = "postgres",
        help = "Storage backend: 'postgres' for durable storage or 'memory' for local runs"
    )]
    pub store: StoreBackend,

    /// PostgreSQL connection URL (postgres store only)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled connections (postgres store only)
    #[arg(
        long = "max-connections",
        value_name = "COUNT",
        env = "PG_MAX_CONNECTIONS",
        help = "Maximum pooled connections (default: 4 per CPU core)"
    )]
    pub max_connections: Option<u32>,

    /// Connections kept open while idle (postgres store only)
    #[arg(long = "min-connections", value_name = "COUNT", env = "PG_MIN_CONNECTIONS")]
    pub min_connections: Option<u32>,

    /// Seconds to wait for a free pooled connection
    #[arg(long = "acquire-timeout-secs", value_name = "SECS", env = "PG_ACQUIRE_TIMEOUT")]
    pub acquire_timeout_secs: Option<u64>,

    /// Deadline for a single store call in milliseconds, 0 disables it
    #[arg(
        long = "operation-timeout-ms",
        value_name = "MILLIS",
        env = "LEDGER_OPERATION_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub operation_timeout_ms: u64,

    /// Seconds allowed for handling one HTTP request
    #[arg(long = "request-timeout-secs", value_name = "SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Seconds in-flight requests may run after a shutdown signal
    #[arg(long = "shutdown-timeout-secs", value_name = "SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long = "log-level", env = "LEDGER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Available storage backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

/// Configuration that cannot be turned into a running service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--database-url (or DATABASE_URL) is required for the postgres store")]
    MissingDatabaseUrl,
}

impl CliArgs {
    /// Create a PoolConfig from CLI arguments
    ///
    /// Unset values use the defaults; zero values fall back to the defaults
    /// with a warning.
    pub fn to_pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let url = self
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let default = PoolConfig::with_url(url);
        Ok(PoolConfig::new(
            url,
            self.max_connections.unwrap_or(default.max_connections),
            self.min_connections.unwrap_or(default.min_connections),
            self.acquire_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(default.acquire_timeout),
        ))
    }

    /// Create an EngineConfig from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::from_millis(self.operation_timeout_ms)
    }

    /// Create a GatewayConfig from CLI arguments
    pub fn to_gateway_config(&self) -> GatewayConfig {
        let default = GatewayConfig::default();

        let request_timeout = if self.request_timeout_secs == 0 {
            warn!(
                default_secs = default.request_timeout.as_secs(),
                "Invalid request_timeout (0), using default"
            );
            default.request_timeout
        } else {
            Duration::from_secs(self.request_timeout_secs)
        };

        GatewayConfig {
            host: self.host,
            port: self.port,
            request_timeout,
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout_secs),
        }
    }
}
