//! Wallet handlers
//!
//! Decode the transport request, call the engine, encode the result.

use super::dto::{HealthBody, WalletRequest};
use super::error::GatewayError;
use super::AppState;
use crate::types::{Wallet, WalletId};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use tracing::{debug, warn};

/// `POST /api/v1/wallet`
pub async fn operate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WalletRequest>, JsonRejection>,
) -> Result<Json<Wallet>, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "decode error");
        GatewayError::InvalidBody
    })?;

    debug!(
        wallet = %request.wallet_id,
        operation = %request.operation_type,
        amount = request.amount,
        "operate request"
    );

    let balance = state
        .engine
        .operate(request.wallet_id, &request.operation_type, request.amount)
        .await?;

    Ok(Json(Wallet::new(request.wallet_id, balance)))
}

/// `GET /api/v1/wallets/:wallet_id`
pub async fn balance(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Wallet>, GatewayError> {
    let wallet = raw_id.parse::<WalletId>().map_err(|err| {
        warn!(wallet = %raw_id, error = %err, "invalid uuid");
        GatewayError::InvalidWalletId
    })?;

    let balance = state.engine.balance(wallet).await?;

    Ok(Json(Wallet::new(wallet, balance)))
}

/// `GET /health`
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
    })
}
