use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;

pub const DEFAULT_GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug)]
pub struct Config {
    /// Shared key used when a request does not carry its own.
    pub fallback_api_key: SecretString,
    pub google_api_base: String,
    pub openai_api_base: String,
    pub ai_request_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            fallback_api_key: SecretString::new(require_env("FALLBACK_AI_API_KEY")?),
            google_api_base: env_or("GOOGLE_API_BASE", DEFAULT_GOOGLE_API_BASE),
            openai_api_base: env_or("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            ai_request_timeout: Duration::from_secs(
                env_or("AI_REQUEST_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("AI_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}
