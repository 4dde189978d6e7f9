// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("A flashcard collection named '{0}' already exists")]
    CollectionExists(String),

    #[error("Free tier limit reached: {0}")]
    QuotaExceeded(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Payment API error: {0}")]
    Stripe(String),

    #[error("Completion API error: {0}")]
    LlmApi(String),

    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body: `{"error": {"code", "message"}}`.
///
/// Every failure carries a non-empty `error.message` so clients (the checkout
/// result page in particular) can always render something.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::CollectionExists(_) => {
                (StatusCode::CONFLICT, "collection_exists", self.to_string())
            }
            AppError::QuotaExceeded(_) => {
                (StatusCode::FORBIDDEN, "quota_exceeded", self.to_string())
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    msg.clone(),
                )
            }
            AppError::Stripe(msg) => {
                tracing::error!(error = %msg, "Stripe API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "stripe_error",
                    msg.clone(),
                )
            }
            AppError::LlmApi(msg) => {
                tracing::error!(error = %msg, "Completion API error");
                (StatusCode::BAD_GATEWAY, "llm_error", msg.clone())
            }
            AppError::MalformedUpstream(msg) => {
                tracing::error!(error = %msg, "Malformed completion response");
                (StatusCode::BAD_GATEWAY, "malformed_upstream", msg.clone())
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                // Do not leak Firestore details to clients
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "internal database error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
