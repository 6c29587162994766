//! Game endpoints: state projection and player actions.

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::render::GameSnapshot;
use crate::types::{CloseReason, ClosedTrade, OpenRequest, Position};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetBalanceRequest {
    balance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    closed: Option<ClosedTrade>,
}

async fn get_state(State(state): State<AppState>) -> Result<Json<GameSnapshot>> {
    let session = state
        .session
        .read()
        .map_err(|_| AppError::Internal("session lock poisoned".to_string()))?;
    Ok(Json(session.snapshot()))
}

async fn open_position(
    State(state): State<AppState>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<Position>> {
    let mut session = state
        .session
        .write()
        .map_err(|_| AppError::Internal("session lock poisoned".to_string()))?;
    let position = session.open_position(request)?;
    Ok(Json(position))
}

async fn close_position(State(state): State<AppState>) -> Result<Json<CloseResponse>> {
    let mut session = state
        .session
        .write()
        .map_err(|_| AppError::Internal("session lock poisoned".to_string()))?;
    let closed = session.close_position(CloseReason::Manual, None);
    Ok(Json(CloseResponse { closed }))
}

async fn set_balance(
    State(state): State<AppState>,
    Json(request): Json<SetBalanceRequest>,
) -> Result<Json<Value>> {
    let mut session = state
        .session
        .write()
        .map_err(|_| AppError::Internal("session lock poisoned".to_string()))?;
    session.set_balance(request.balance)?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn reset(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut session = state
        .session
        .write()
        .map_err(|_| AppError::Internal("session lock poisoned".to_string()))?;
    session.reset();
    Ok(Json(json!({ "status": "ok" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/open", post(open_position))
        .route("/api/close", post(close_position))
        .route("/api/balance", post(set_balance))
        .route("/api/reset", post(reset))
}
