//! Static catalog of providers and the models the wizard offers for each.

use serde::Serialize;

use super::ProviderKind;

#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub default_model: &'static str,
    pub models: &'static [ModelEntry],
}

const GOOGLE_MODELS: &[ModelEntry] = &[
    ModelEntry { id: "gemini-2.5-flash", name: "Gemini 2.5 Flash" },
    ModelEntry { id: "gemini-3-flash", name: "Gemini 3 Flash" },
    ModelEntry { id: "gemini-3-pro-low", name: "Gemini 3 Pro (Low)" },
    ModelEntry { id: "gemini-3-pro-high", name: "Gemini 3 Pro (High)" },
];

const OPENAI_MODELS: &[ModelEntry] = &[
    ModelEntry { id: "gpt-5.2", name: "GPT 5.2" },
    ModelEntry { id: "gpt-5.1", name: "GPT 5.1" },
    ModelEntry { id: "gpt-5", name: "GPT 5" },
];

fn models_for(kind: ProviderKind) -> &'static [ModelEntry] {
    match kind {
        ProviderKind::Google => GOOGLE_MODELS,
        ProviderKind::OpenAi => OPENAI_MODELS,
    }
}

/// Providers in the order the wizard lists them.
pub fn providers() -> Vec<ProviderEntry> {
    [ProviderKind::Google, ProviderKind::OpenAi]
        .into_iter()
        .map(|kind| ProviderEntry {
            id: kind.id(),
            name: kind.product_name(),
            default_model: kind.default_model(),
            models: models_for(kind),
        })
        .collect()
}
