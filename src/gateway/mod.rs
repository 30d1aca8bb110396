//! HTTP gateway
//!
//! Thin axum adapter in front of the [`OperationEngine`]. It knows the wire
//! format and the status-code mapping, nothing about balances.
//!
//! | Method | Path                       | Engine call        |
//! |--------|----------------------------|--------------------|
//! | POST   | `/api/v1/wallet`           | `operate`          |
//! | GET    | `/api/v1/wallets/:id`      | `balance`          |
//! | GET    | `/health`                  | none               |

pub mod dto;
pub mod error;
pub mod handlers;

pub use error::GatewayError;

use crate::core::OperationEngine;
use crate::types::LedgerError;
use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: OperationEngine,
}

/// Listener and request-handling settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// TCP port to bind
    pub port: u16,
    /// Upper bound for handling one request
    pub request_timeout: Duration,
    /// How long in-flight requests may run after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl GatewayConfig {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

    /// Address to bind the listener to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: Self::DEFAULT_PORT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            shutdown_timeout: Self::DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

/// Build the application router
///
/// A request that outlives `request_timeout` is answered like any other
/// infrastructure failure: 500 with the generic error body.
pub fn router(engine: OperationEngine, config: &GatewayConfig) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/api/v1/wallet", post(handlers::operate))
        .route("/api/v1/wallets/:wallet_id", get(handlers::balance))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> GatewayError {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        GatewayError::Ledger(LedgerError::DeadlineExceeded)
    } else {
        error!(error = %err, "unhandled middleware error");
        GatewayError::Ledger(LedgerError::storage(err.to_string()))
    }
}
