/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 401 の body は {"error":"Unauthorized","message":"<reason>"} に固定
 *   (stack trace / claim の内容 / 検証失敗の詳細は返さない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::Rejection;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(Rejection),
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(rejection) => {
                (StatusCode::UNAUTHORIZED, rejection.message().to_string())
            }
            AppError::NotFound { path } => (StatusCode::NOT_FOUND, format!("No route for {path}")),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error"),
            message,
        };

        (status, Json(body)).into_response()
    }
}
