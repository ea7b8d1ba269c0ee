//! Moderation settings (the `[moderation]` table of `portfoliohub.toml`).

use serde::{Deserialize, Serialize};

/// Terms whose presence anywhere in a comment (case-insensitive) rejects it
/// on the fallback path.
pub const DEFAULT_BLOCKED_TERMS: &[&str] = &[
    "connard",
    "salaud",
    "merde",
    "putain",
    "con",
    "idiot",
    "débile",
    "nazi",
    "hitler",
    "mort",
    "tuer",
    "suicide",
    "spam",
    "publicité",
    "sexe",
    "porn",
    "xxx",
    "nude",
    "fuck",
    "shit",
    "bitch",
    "asshole",
];

/// Classifier endpoint and fallback heuristic parameters.
///
/// # Example
///
/// ```toml
/// [moderation]
/// endpoint = "https://openrouter.ai/api/v1/chat/completions"
/// model = "openai/gpt-3.5-turbo"
/// max_tokens = 150
/// temperature = 0.3
/// caps_ratio = 0.7
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// OpenAI-compatible chat completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Classifier model
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token; the classifier is disabled without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Completion token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Fallback: rejected substrings
    #[serde(default = "default_blocked_terms")]
    pub blocked_terms: Vec<String>,
    /// Fallback: uppercase share above which long comments are spam
    #[serde(default = "default_caps_ratio")]
    pub caps_ratio: f64,
    /// Fallback: length a comment must exceed for the caps rule to apply
    #[serde(default = "default_caps_min_length")]
    pub caps_min_length: usize,
    /// Fallback: shortest accepted trimmed comment
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Fallback: longest accepted comment
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.3
}

fn default_blocked_terms() -> Vec<String> {
    DEFAULT_BLOCKED_TERMS.iter().map(|t| t.to_string()).collect()
}

fn default_caps_ratio() -> f64 {
    0.7
}

fn default_caps_min_length() -> usize {
    10
}

fn default_min_length() -> usize {
    3
}

fn default_max_length() -> usize {
    1000
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            blocked_terms: default_blocked_terms(),
            caps_ratio: default_caps_ratio(),
            caps_min_length: default_caps_min_length(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

impl ModerationConfig {
    /// API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl std::fmt::Debug for ModerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("blocked_terms", &self.blocked_terms.len())
            .field("caps_ratio", &self.caps_ratio)
            .field("caps_min_length", &self.caps_min_length)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .finish()
    }
}
