//! Google Generative Language API adapter (`generateContent`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::{AiProvider, CompletionRequest, ProviderKind};

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

pub struct GoogleProvider {
    client: Client,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl AiProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        model: &str,
        api_key: &SecretString,
    ) -> RequestBuilder {
        // generateContent has no system role here; the system text leads the single user part.
        let text = match &request.system {
            Some(system) => format!("{system}\n\n{}", request.user),
            None => request.user.clone(),
        };

        let generation_config = (request.json_output
            || request.temperature.is_some()
            || request.max_tokens.is_some())
        .then(|| GenerationConfig {
            response_mime_type: request.json_output.then_some(JSON_MIME_TYPE),
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        });

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config,
        };

        self.client
            .post(self.endpoint(model))
            .query(&[("key", api_key.expose_secret().as_str())])
            .json(&body)
    }

    fn extract_text(&self, envelope: &Value) -> Option<String> {
        envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
