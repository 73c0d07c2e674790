pub mod health;
pub mod providers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pathways::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/ai-providers", get(providers::providers_handler))
        .route(
            "/api/generate-pathways",
            post(handlers::handle_generate_pathways),
        )
        .route("/api/test-ai", post(handlers::handle_test_ai))
        .with_state(state)
}
