//! Gateway error mapping
//!
//! Translates ledger outcomes into HTTP status codes. Infrastructure
//! failures are rendered with a generic message so storage details never
//! reach the client.

use super::dto::ErrorBody;
use crate::types::{ErrorKind, LedgerError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Message returned for every infrastructure failure
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Errors produced while serving a request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The JSON body could not be decoded
    #[error("invalid request body")]
    InvalidBody,

    /// The wallet ID in the path is not a UUID
    #[error("invalid wallet id")]
    InvalidWalletId,

    /// The ledger refused or failed the operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl GatewayError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidBody | GatewayError::InvalidWalletId => StatusCode::BAD_REQUEST,
            GatewayError::Ledger(err) => match err {
                LedgerError::WalletNotFound { .. } => StatusCode::NOT_FOUND,
                LedgerError::InsufficientFunds { .. } => StatusCode::CONFLICT,
                err if err.kind() == ErrorKind::Validation => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-facing message
    pub fn message(&self) -> String {
        match self {
            GatewayError::Ledger(err) if err.is_infrastructure() => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
