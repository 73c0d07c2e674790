use axum::Json;

use crate::llm_client::catalog::{self, ProviderEntry};

/// GET /api/ai-providers
/// Lists the providers and models the wizard can offer.
pub async fn providers_handler() -> Json<Vec<ProviderEntry>> {
    Json(catalog::providers())
}
