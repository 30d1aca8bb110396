//! HTTP gateway tests
//!
//! Requests go through the full router (layers included) with
//! `tower::ServiceExt::oneshot`, backed by the in-memory store.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;
use wallet_ledger::gateway::{self, GatewayConfig};
use wallet_ledger::{
    Balance, EngineConfig, LedgerError, LedgerResult, LedgerStore, MemoryLedgerStore,
    OperationEngine, WalletId,
};

/// Store that fails every call with a storage error
struct BrokenStore;

#[async_trait]
impl LedgerStore for BrokenStore {
    async fn get_balance(&self, _wallet: WalletId) -> LedgerResult<Balance> {
        Err(LedgerError::storage("connection refused by 10.0.0.5:5432"))
    }

    async fn deposit(&self, _wallet: WalletId, _amount: Balance) -> LedgerResult<Balance> {
        Err(LedgerError::storage("connection refused by 10.0.0.5:5432"))
    }

    async fn withdraw(&self, _wallet: WalletId, _amount: Balance) -> LedgerResult<Balance> {
        Err(LedgerError::storage("connection refused by 10.0.0.5:5432"))
    }
}

/// Store that answers only after a minute
struct SlowStore;

impl SlowStore {
    const DELAY: Duration = Duration::from_secs(60);
}

#[async_trait]
impl LedgerStore for SlowStore {
    async fn get_balance(&self, _wallet: WalletId) -> LedgerResult<Balance> {
        tokio::time::sleep(Self::DELAY).await;
        Ok(0)
    }

    async fn deposit(&self, _wallet: WalletId, amount: Balance) -> LedgerResult<Balance> {
        tokio::time::sleep(Self::DELAY).await;
        Ok(amount)
    }

    async fn withdraw(&self, _wallet: WalletId, _amount: Balance) -> LedgerResult<Balance> {
        tokio::time::sleep(Self::DELAY).await;
        Ok(0)
    }
}

fn app_with(store: Arc<dyn LedgerStore>) -> Router {
    gateway::router(OperationEngine::new(store), &GatewayConfig::default())
}

fn app() -> Router {
    app_with(Arc::new(MemoryLedgerStore::new()))
}

fn post_wallet(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/wallet")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get_wallet(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/v1/wallets/{id}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn operation(wallet: Uuid, operation_type: &str, amount: i64) -> Request<Body> {
    post_wallet(
        json!({
            "walletId": wallet,
            "operationType": operation_type,
            "amount": amount,
        })
        .to_string(),
    )
}

#[tokio::test]
async fn test_deposit_returns_wallet() {
    let app = app();
    let wallet = Uuid::new_v4();

    let (status, body) = send(&app, operation(wallet, "DEPOSIT", 500)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "walletId": wallet, "balance": 500 }));
}

#[tokio::test]
async fn test_round_trip_over_http() {
    let app = app();
    let wallet = Uuid::new_v4();

    send(&app, operation(wallet, "DEPOSIT", 500)).await;
    let (status, body) = send(&app, operation(wallet, "WITHDRAW", 200)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 300);

    let (status, body) = send(&app, operation(wallet, "WITHDRAW", 1000)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("not enough funds"));

    let (status, body) = send(&app, get_wallet(&wallet.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "walletId": wallet, "balance": 300 }));
}

#[rstest]
#[case::zero_amount("DEPOSIT", 0, StatusCode::BAD_REQUEST)]
#[case::negative_amount("WITHDRAW", -10, StatusCode::BAD_REQUEST)]
#[case::unknown_operation("TRANSFER", 10, StatusCode::BAD_REQUEST)]
#[case::withdraw_unknown_wallet("WITHDRAW", 10, StatusCode::NOT_FOUND)]
#[case::lowercase_deposit("deposit", 10, StatusCode::OK)]
#[tokio::test]
async fn test_operation_status(
    #[case] operation_type: &str,
    #[case] amount: i64,
    #[case] expected: StatusCode,
) {
    let app = app();
    let (status, body) = send(&app, operation(Uuid::new_v4(), operation_type, amount)).await;

    assert_eq!(status, expected);
    if expected != StatusCode::OK {
        assert!(body["error"].is_string());
    }
}

#[rstest]
#[case::not_json("not json")]
#[case::missing_amount(r#"{"walletId":"6f1b7d4e-3c2a-4b8e-9f0d-1a2b3c4d5e6f","operationType":"DEPOSIT"}"#)]
#[case::bad_wallet_id(r#"{"walletId":"abc","operationType":"DEPOSIT","amount":5}"#)]
#[case::fractional_amount(r#"{"walletId":"6f1b7d4e-3c2a-4b8e-9f0d-1a2b3c4d5e6f","operationType":"DEPOSIT","amount":1.5}"#)]
#[tokio::test]
async fn test_malformed_body_is_bad_request(#[case] raw: &'static str) {
    let app = app();
    let (status, body) = send(&app, post_wallet(raw)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid request body" }));
}

#[tokio::test]
async fn test_balance_invalid_uuid() {
    let app = app();
    let (status, body) = send(&app, get_wallet("not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid wallet id" }));
}

#[tokio::test]
async fn test_balance_unknown_wallet() {
    let app = app();
    let wallet = Uuid::new_v4();
    let (status, body) = send(&app, get_wallet(&wallet.to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": format!("wallet {wallet} not found") }));
}

#[tokio::test]
async fn test_storage_failure_hides_detail() {
    let app = app_with(Arc::new(BrokenStore));
    let wallet = Uuid::new_v4();

    for request in [operation(wallet, "DEPOSIT", 10), get_wallet(&wallet.to_string())] {
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal server error" }));
    }
}

// The default request timeout is 10 s, the store needs 60 s
#[rstest]
#[case::engine_deadline_disabled(0)]
#[case::engine_deadline_after_request_timeout(30_000)]
#[case::engine_deadline_first(1_000)]
#[tokio::test(start_paused = true)]
async fn test_slow_store_is_internal_error(#[case] call_timeout_ms: u64) {
    let engine =
        OperationEngine::with_config(Arc::new(SlowStore), EngineConfig::from_millis(call_timeout_ms));
    let app = gateway::router(engine, &GatewayConfig::default());
    let wallet = Uuid::new_v4();

    for request in [operation(wallet, "DEPOSIT", 10), get_wallet(&wallet.to_string())] {
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal server error" }));
    }
}

#[tokio::test]
async fn test_validation_precedes_broken_store() {
    let app = app_with(Arc::new(BrokenStore));
    let (status, _) = send(&app, operation(Uuid::new_v4(), "DEPOSIT", 0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();
    let request = Request::builder()
        .uri("/api/v1/unknown")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
