use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every error body is `{ "message": string }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A provider rejected a credential check.
    #[error("Connectivity check failed: {0}")]
    Connectivity(String),

    /// Generation failed on every attempt.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Internal(anyhow::anyhow!("Malformed request body: {rejection}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Connectivity(msg) => {
                tracing::warn!("Connectivity check failed: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Llm(e) => {
                match e {
                    LlmError::Api {
                        provider, status, ..
                    } => tracing::error!(%provider, status, "LLM error: {e}"),
                    LlmError::Http { provider, source } => {
                        tracing::error!(%provider, error = %source, "LLM error: {e}")
                    }
                    _ => tracing::error!("LLM error: {e}"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, format!("AI Error: {e}"))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
