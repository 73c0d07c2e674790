use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Holds the fallback API key, so it is shared behind an `Arc` rather than cloned.
    pub config: Arc<Config>,
}
