use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// GET /coins
pub async fn get_coins(State(state): State<AppState>) -> Response {
    let coins = state.snapshots.read().await.clone();

    (
        StatusCode::OK,
        Json(json!({
            "vs_currency": state.settings.vs_currency,
            "poll_interval_secs": state.settings.poll_interval.as_secs(),
            "coins": coins,
        })),
    )
        .into_response()
}

// GET /coins/:id
pub async fn get_coin(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = id.trim().to_lowercase();
    let snapshots = state.snapshots.read().await;

    match snapshots.iter().find(|c| c.id == id) {
        Some(coin) => (StatusCode::OK, Json(coin.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown coin '{id}'") })),
        )
            .into_response(),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
