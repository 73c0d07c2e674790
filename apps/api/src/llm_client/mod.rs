/// LLM Client: the single point of entry for all provider calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Each vendor is an `AiProvider` adapter; `LlmClient` picks one per request.
use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod catalog;
pub mod google;
pub mod openai;
pub mod prompts;

use google::GoogleProvider;
use openai::OpenAiProvider;

// ────────────────────────────────────────────────────────────────────────────
// Provider selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    OpenAi,
}

impl ProviderKind {
    /// Missing or blank selects Google; "google" selects Google; anything else is OpenAI.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => ProviderKind::Google,
            Some(v) if v.eq_ignore_ascii_case("google") => ProviderKind::Google,
            Some(_) => ProviderKind::OpenAi,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Google => "Google AI",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    /// Product name shown to the user on a successful connectivity check.
    pub fn product_name(self) -> &'static str {
        match self {
            ProviderKind::Google => "Google Gemini",
            ProviderKind::OpenAi => "OpenAI GPT",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Google => "gemini-2.5-flash",
            ProviderKind::OpenAi => "gpt-5",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider, model and key for one request, after defaults are applied.
#[derive(Debug)]
pub struct AiTarget {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: SecretString,
}

impl AiTarget {
    pub fn resolve(
        api_key: Option<SecretString>,
        provider: Option<&str>,
        model: Option<&str>,
        fallback_key: &SecretString,
    ) -> Self {
        let provider = ProviderKind::resolve(provider);
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(provider.default_model())
            .to_string();
        let api_key = api_key
            .filter(|k| !k.expose_secret().trim().is_empty())
            .unwrap_or_else(|| SecretString::new(fallback_key.expose_secret().clone()));

        Self {
            provider,
            model,
            api_key,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / error types
// ────────────────────────────────────────────────────────────────────────────

/// Provider-agnostic completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    /// Ask the provider for a JSON-typed response.
    pub json_output: bool,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            json_output: false,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// No response arrived (connect failure, timeout). The source carries no URL,
    /// since Google sends the key in the query string.
    #[error("{}", transport_message(.provider, .source))]
    Http {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{}", api_message(.provider, .message))]
    Api {
        provider: ProviderKind,
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid JSON response from {}", .provider.label())]
    MissingContent { provider: ProviderKind },

    #[error("Invalid JSON response from {}", .provider.label())]
    InvalidJson { provider: ProviderKind },

    #[error("Unexpected response shape from {}: {detail}", .provider.label())]
    ShapeMismatch {
        provider: ProviderKind,
        detail: String,
    },
}

fn transport_message(provider: &ProviderKind, source: &reqwest::Error) -> String {
    if source.is_timeout() {
        format!("{} request timed out", provider.label())
    } else {
        format!("Could not reach {}", provider.label())
    }
}

fn api_message(provider: &ProviderKind, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("{} Request failed", provider.label()),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider adapters
// ────────────────────────────────────────────────────────────────────────────

/// One external AI vendor. Adapters only translate requests and envelopes;
/// sending and status handling are shared.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn build_request(
        &self,
        request: &CompletionRequest,
        model: &str,
        api_key: &SecretString,
    ) -> RequestBuilder;

    /// Pulls the single text payload out of a success envelope.
    fn extract_text(&self, envelope: &Value) -> Option<String>;

    /// Sends the request and returns the model's raw text output.
    async fn generate(
        &self,
        request: &CompletionRequest,
        model: &str,
        api_key: &SecretString,
    ) -> Result<String, LlmError> {
        let provider = self.kind();
        let response = send_checked(provider, self.build_request(request, model, api_key)).await?;
        let envelope: Value = response
            .json()
            .await
            .map_err(|_| LlmError::MissingContent { provider })?;

        self.extract_text(&envelope)
            .ok_or(LlmError::MissingContent { provider })
    }

    /// Sends the request and only checks that the provider accepted it.
    async fn probe(
        &self,
        request: &CompletionRequest,
        model: &str,
        api_key: &SecretString,
    ) -> Result<(), LlmError> {
        send_checked(self.kind(), self.build_request(request, model, api_key)).await?;
        Ok(())
    }
}

/// Sends a request and maps any non-2xx status into `LlmError::Api`.
async fn send_checked(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<Response, LlmError> {
    let response = request.send().await.map_err(|e| LlmError::Http {
        provider,
        source: e.without_url(),
    })?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty());

    warn!(
        provider = %provider,
        status = status.as_u16(),
        "Provider returned an error status"
    );

    Err(LlmError::Api {
        provider,
        status: status.as_u16(),
        message,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client shared by all handlers.
#[derive(Clone)]
pub struct LlmClient {
    google: Arc<dyn AiProvider>,
    openai: Arc<dyn AiProvider>,
}

impl LlmClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.ai_request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            google: Arc::new(GoogleProvider::new(
                client.clone(),
                config.google_api_base.clone(),
            )),
            openai: Arc::new(OpenAiProvider::new(client, config.openai_api_base.clone())),
        })
    }

    pub fn provider(&self, kind: ProviderKind) -> &dyn AiProvider {
        match kind {
            ProviderKind::Google => self.google.as_ref(),
            ProviderKind::OpenAi => self.openai.as_ref(),
        }
    }

    /// Calls the target provider and returns its raw text output.
    pub async fn generate(
        &self,
        target: &AiTarget,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        debug!(provider = %target.provider, model = %target.model, "Calling provider");
        let text = self
            .provider(target.provider)
            .generate(request, &target.model, &target.api_key)
            .await?;
        debug!(provider = %target.provider, chars = text.len(), "Provider call succeeded");
        Ok(text)
    }

    /// Calls the provider and deserializes the text output as JSON.
    /// Text that is not JSON is `InvalidJson`; JSON that does not fit `T` is `ShapeMismatch`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        target: &AiTarget,
        request: &CompletionRequest,
    ) -> Result<T, LlmError> {
        let provider = target.provider;
        let text = self.generate(target, request).await?;

        let value: Value = serde_json::from_str(strip_json_fences(&text)).map_err(|e| {
            debug!(provider = %provider, error = %e, "Provider text is not JSON");
            LlmError::InvalidJson { provider }
        })?;

        serde_json::from_value(value).map_err(|e| LlmError::ShapeMismatch {
            provider,
            detail: e.to_string(),
        })
    }

    /// Minimal round trip used to validate user-supplied credentials.
    pub async fn probe(
        &self,
        target: &AiTarget,
        request: &CompletionRequest,
    ) -> Result<(), LlmError> {
        self.provider(target.provider)
            .probe(request, &target.model, &target.api_key)
            .await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}
