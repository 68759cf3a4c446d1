/*
 * Responsibility
 * - GET /actuator/health (疎通用・運用監視用)
 * - /actuator 配下は public path なので Bearer 不要
 */
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "UP"})))
}
