//! Credential check run by the wizard before a user-supplied key is accepted.

use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

use crate::llm_client::prompts::{CONNECTIVITY_MAX_TOKENS, CONNECTIVITY_PROMPT};
use crate::llm_client::{AiTarget, CompletionRequest, LlmClient, LlmError, ProviderKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAiRequest {
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// The fixed probe prompt. No JSON mode, no temperature; OpenAI also gets a token cap.
pub fn connectivity_prompt(provider: ProviderKind) -> CompletionRequest {
    let request = CompletionRequest::new(CONNECTIVITY_PROMPT);
    match provider {
        ProviderKind::OpenAi => request.with_max_tokens(CONNECTIVITY_MAX_TOKENS),
        ProviderKind::Google => request,
    }
}

/// Succeeds when the provider accepts the probe. The reply text is not inspected.
pub async fn test_connectivity(llm: &LlmClient, target: &AiTarget) -> Result<(), LlmError> {
    llm.probe(target, &connectivity_prompt(target.provider)).await?;
    info!(provider = %target.provider, model = %target.model, "Connectivity check passed");
    Ok(())
}

/// User-facing text for a failed check.
pub fn failure_message(provider: ProviderKind, error: &LlmError) -> String {
    match error {
        LlmError::Api { message: None, .. } => format!("{} test failed", provider.label()),
        other => other.to_string(),
    }
}

pub fn success_message(provider: ProviderKind) -> String {
    format!("Successfully connected to {}!", provider.product_name())
}
