//! Request and response bodies for the HTTP gateway

use crate::types::{Balance, WalletId};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/wallet`
///
/// `operationType` stays a plain string here; the engine owns its validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
    pub wallet_id: WalletId,
    pub operation_type: String,
    pub amount: Balance,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}
