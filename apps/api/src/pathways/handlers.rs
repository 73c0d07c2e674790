//! Axum route handlers for the Pathways API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::AiTarget;
use crate::models::pathway::PathwayResponse;
use crate::pathways::connectivity::{
    failure_message, success_message, test_connectivity, TestAiRequest,
};
use crate::pathways::generator::{generate_with_retry, GeneratePathwaysRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/generate-pathways
///
/// Builds the prompt from the profile, calls the selected provider (one retry)
/// and returns the validated PathwayResponse.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_generate_pathways(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePathwaysRequest>, JsonRejection>,
) -> Result<Json<PathwayResponse>, AppError> {
    let Json(request) = payload?;

    let target = AiTarget::resolve(
        request.api_key,
        request.ai_provider.as_deref(),
        request.ai_model.as_deref(),
        &state.config.fallback_api_key,
    );
    info!(
        provider = %target.provider,
        model = %target.model,
        goal = ?request.profile.goal,
        "Generating pathways"
    );

    let response = generate_with_retry(
        &state.llm,
        &target,
        &request.profile,
        request.language.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

/// POST /api/test-ai
///
/// Sends a minimal prompt with the supplied credentials. A blank key is
/// rejected before any provider call.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_test_ai(
    State(state): State<AppState>,
    payload: Result<Json<TestAiRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload?;

    let api_key = request
        .api_key
        .filter(|k| !k.expose_secret().trim().is_empty())
        .ok_or_else(|| AppError::Validation("API Key is required".to_string()))?;

    let target = AiTarget::resolve(
        Some(api_key),
        request.provider.as_deref(),
        request.model.as_deref(),
        &state.config.fallback_api_key,
    );

    test_connectivity(&state.llm, &target)
        .await
        .map_err(|e| AppError::Connectivity(failure_message(target.provider, &e)))?;

    Ok(Json(MessageResponse {
        message: success_message(target.provider),
    }))
}
