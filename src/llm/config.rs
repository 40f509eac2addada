//! Generation config and its pre-flight validation.

use crate::error::GenerateError;

/// Settings for one generation call. Owned by the caller, never mutated here.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    /// Number of suggestions to request. Signed because it arrives from
    /// loosely typed sources (flags, env) and is range-checked here.
    pub quantity: i32,
    /// Upper bound on completion tokens; 0 leaves it to the backend.
    pub max_output_tokens: i32,
    pub system_prompt: String,
    /// Pre-rendered user prompt. Blank means "build the default prompt".
    pub user_prompt: Option<String>,
}

impl GenerationConfig {
    /// The caller-supplied user prompt, if it has any content.
    pub fn user_prompt(&self) -> Option<&str> {
        self.user_prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
    }

    /// Quantity as a schema bound, clamped to at least one.
    pub fn max_items(&self) -> usize {
        usize::try_from(self.quantity).unwrap_or(0).max(1)
    }
}

type Check = (&'static str, fn(&GenerationConfig) -> bool, &'static str);

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks in reporting order. The first failing entry wins.
const CHECKS: [Check; 7] = [
    ("api_key", |c| !blank(&c.api_key), "api key is required"),
    ("provider", |c| !blank(&c.provider), "provider name is required"),
    ("model", |c| !blank(&c.model), "model identifier is required"),
    ("base_url", |c| !blank(&c.base_url), "base URL is required"),
    (
        "system_prompt",
        |c| !blank(&c.system_prompt),
        "system prompt is required",
    ),
    (
        "quantity",
        |c| c.quantity > 0,
        "quantity must be greater than zero",
    ),
    (
        "max_output_tokens",
        |c| c.max_output_tokens >= 0,
        "max output tokens must not be negative",
    ),
];

/// Validate a config before any provider resolution or network activity.
pub fn validate(config: &GenerationConfig) -> Result<(), GenerateError> {
    match CHECKS.iter().find(|(_, ok, _)| !ok(config)) {
        Some(&(field, _, reason)) => Err(GenerateError::InvalidConfig { field, reason }),
        None => Ok(()),
    }
}
