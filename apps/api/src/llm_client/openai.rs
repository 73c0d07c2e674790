//! OpenAI Chat Completions adapter.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::{AiProvider, CompletionRequest, ProviderKind};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        model: &str,
        api_key: &SecretString,
    ) -> RequestBuilder {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });

        let body = ChatCompletionRequest {
            model,
            messages,
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        self.client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
    }

    fn extract_text(&self, envelope: &Value) -> Option<String> {
        envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::llm_client::test_support::spawn_upstream;
    use crate::llm_client::LlmError;

    fn provider(base: &str) -> OpenAiProvider {
        OpenAiProvider::new(Client::new(), base.to_string())
    }

    fn key(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    fn body_json(request: &reqwest::Request) -> Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_request_uses_bearer_token_and_fixed_endpoint() {
        let request = provider("https://api.openai.com/v1")
            .build_request(&CompletionRequest::new("hi"), "gpt-5", &key("sk-abc"))
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(request.url().query(), None);
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer sk-abc"
        );
    }

    #[test]
    fn test_request_body_has_system_user_pair_and_json_format() {
        let completion = CompletionRequest::new("user text")
            .with_system("system text")
            .with_json_output()
            .with_temperature(0.7);

        let request = provider("http://upstream")
            .build_request(&completion, "gpt-5.1", &key("k"))
            .build()
            .unwrap();

        assert_eq!(
            body_json(&request),
            json!({
                "model": "gpt-5.1",
                "messages": [
                    { "role": "system", "content": "system text" },
                    { "role": "user", "content": "user text" }
                ],
                "response_format": { "type": "json_object" },
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_probe_style_request_carries_max_tokens_only() {
        let completion = CompletionRequest::new("ping").with_max_tokens(5);
        let request = provider("http://upstream")
            .build_request(&completion, "gpt-5", &key("k"))
            .build()
            .unwrap();

        assert_eq!(
            body_json(&request),
            json!({
                "model": "gpt-5",
                "messages": [{ "role": "user", "content": "ping" }],
                "max_tokens": 5
            })
        );
    }

    #[tokio::test]
    async fn test_generate_reads_first_choice() {
        let auth: Arc<Mutex<Vec<String>>> = Arc::default();
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    |State(auth): State<Arc<Mutex<Vec<String>>>>, headers: HeaderMap| async move {
                        let value = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        auth.lock().unwrap().push(value);
                        Json(json!({
                            "choices": [
                                { "message": { "role": "assistant", "content": "{\"a\":1}" } },
                                { "message": { "role": "assistant", "content": "ignored" } }
                            ]
                        }))
                    },
                ),
            )
            .with_state(auth.clone());
        let base = spawn_upstream(app).await;

        let text = provider(&format!("{base}/v1"))
            .generate(&CompletionRequest::new("hi"), "gpt-5", &key("sk-user"))
            .await
            .unwrap();

        assert_eq!(text, "{\"a\":1}");
        assert_eq!(*auth.lock().unwrap(), vec!["Bearer sk-user".to_string()]);
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_provider_message() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
                    })),
                )
            }),
        );
        let base = spawn_upstream(app).await;

        let err = provider(&format!("{base}/v1"))
            .probe(&CompletionRequest::new("hi"), "gpt-5", &key("bad"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 401, .. }));
        assert_eq!(err.to_string(), "Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_probe_ignores_body_on_success() {
        let app = Router::new().route("/v1/chat/completions", post(|| async { "not even json" }));
        let base = spawn_upstream(app).await;

        provider(&format!("{base}/v1"))
            .probe(&CompletionRequest::new("hi"), "gpt-5", &key("k"))
            .await
            .unwrap();
    }
}
