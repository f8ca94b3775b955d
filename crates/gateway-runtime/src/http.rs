//! Thin HTTP surface over the gateway and projection.
//!
//! Every handler maps one route onto one core call and serializes the
//! outcome; no business logic lives here. A request made while the ledger
//! is down under the strict policy gets an explicit 503, never an empty
//! success.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use ht_02_tx_gateway::TransactionGateway;
use ht_03_provenance::{next_stage, token_for};
use shared_types::GatewayError;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    gateway: Arc<TransactionGateway>,
}

/// Build the full API router.
pub fn router(gateway: Arc<TransactionGateway>) -> Router {
    let state = AppState { gateway };

    Router::new()
        .route("/api/ledger/invoke", post(invoke))
        .route("/api/ledger/query", post(query))
        .route("/api/ledger/batch/:batch_id", get(batch_provenance))
        .route("/api/ledger/projection/:batch_id", get(batch_projection))
        .route("/api/ledger/active-batches", get(active_batches))
        .route("/api/ledger/transactions", get(transaction_feed))
        .route("/api/ledger/raw-transaction/:tx_id", get(raw_transaction))
        .route("/api/ledger/token/:batch_id", get(step_token))
        .route("/api/ledger/reset", post(reset))
        .route("/api/ledger/health", get(health))
        .route("/api/ledger/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest {
    function: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    batch_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    function: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Deserialize)]
struct FeedParams {
    limit: Option<usize>,
}

async fn invoke(
    State(state): State<AppState>,
    Json(request): Json<InvokeRequest>,
) -> impl IntoResponse {
    let outcome = state
        .gateway
        .invoke(&request.function, &request.args, request.batch_id.as_deref())
        .await;

    match outcome {
        Ok(outcome) => {
            // Next-step guidance from the freshly advanced projection.
            let next = state
                .gateway
                .projector()
                .get_batch(&outcome.batch_id)
                .as_ref()
                .and_then(next_stage);
            let token = next.map(|stage| token_for(&outcome.batch_id, stage));

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "batchId": outcome.batch_id,
                    "transactionId": outcome.transaction_id,
                    "blockNumber": outcome.block.number(),
                    "blockEstimated": outcome.block.is_estimated(),
                    "timestamp": outcome.timestamp,
                    "origin": outcome.origin,
                    "nextStage": next,
                    "token": token,
                })),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    match state.gateway.query(&request.function, &request.args).await {
        Ok(result) => {
            let data = result
                .payload_json()
                .unwrap_or_else(|_| json!(String::from_utf8_lossy(&result.payload)));
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": data,
                    "timestamp": result.timestamp,
                    "origin": result.origin,
                })),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn batch_provenance(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> impl IntoResponse {
    match state.gateway.provenance(&batch_id).await {
        Ok(result) => {
            let data = result
                .payload_json()
                .unwrap_or_else(|_| json!(String::from_utf8_lossy(&result.payload)));
            let profile = state.gateway.profile();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": data,
                    "blockchain": {
                        "network": profile.network_name,
                        "channel": profile.channel,
                        "chaincode": profile.chaincode,
                        "origin": result.origin,
                    },
                    "timestamp": result.timestamp,
                })),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn batch_projection(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> impl IntoResponse {
    match state.gateway.projector().get_batch(&batch_id) {
        Some(batch) => {
            let next = next_stage(&batch);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": batch,
                    "nextStage": next,
                    "timestamp": Utc::now(),
                })),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Batch not found",
            })),
        ),
    }
}

async fn active_batches(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.gateway.projector().list_active())
}

async fn transaction_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20);
    Json(state.gateway.log().recent(limit))
}

async fn raw_transaction(
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
) -> impl IntoResponse {
    match state.gateway.raw_transaction(&tx_id).await {
        Ok(raw) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": raw,
                "timestamp": Utc::now(),
            })),
        ),
        Err(e) => error_response(e),
    }
}

async fn step_token(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> impl IntoResponse {
    // An unknown batch has everything ahead of it, so the next step is
    // collection; a terminal batch has no next step and no token.
    let next = match state.gateway.projector().get_batch(&batch_id) {
        Some(batch) => next_stage(&batch),
        None => Some(shared_types::Stage::Collection),
    };
    let token = next.map(|stage| token_for(&batch_id, stage));

    Json(json!({
        "success": true,
        "batchId": batch_id,
        "nextStage": next,
        "token": token,
    }))
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.gateway.reset_state();
    Json(json!({
        "success": true,
        "message": "transaction log and batch projection cleared",
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.gateway.health();
    Json(json!({
        "status": if report.connected { "connected" } else { "disconnected" },
        "connected": report.connected,
        "reachable": report.reachable,
        "totalTransactions": report.total_transactions,
        "activeBatches": report.active_batches,
        "lastTransactionAt": report.last_transaction_at,
        "timestamp": Utc::now(),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.gateway.metrics().to_json())
}

/// Map a gateway error onto the wire.
fn error_response(error: GatewayError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &error {
        GatewayError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GatewayError::UnknownTransaction(_) => StatusCode::NOT_FOUND,
        GatewayError::Submit(_) | GatewayError::Eval(_) | GatewayError::Resolve(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(json!({
            "success": false,
            "error": error.to_string(),
        })),
    )
}
