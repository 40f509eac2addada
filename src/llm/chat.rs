//! Chat-completions wire format shared by the OpenAI-style backends.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::GenerateError;

use super::config::GenerationConfig;
use super::context::Message;
use super::parse::parse_suggestions;
use super::provider::ProviderCapabilities;
use super::transport::{HttpRequest, HttpResponse};

/// Name given to the structured-output schema.
const SCHEMA_NAME: &str = "commit_suggestions";

/// Which payload field carries the output token limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    MaxTokens,
    MaxCompletionTokens,
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn build_request(
    config: &GenerationConfig,
    messages: &[Message],
    capabilities: ProviderCapabilities,
    token_field: TokenLimitField,
) -> Result<HttpRequest, GenerateError> {
    let token_limit = (capabilities.supports_max_output_tokens && config.max_output_tokens > 0)
        .then_some(config.max_output_tokens);

    let payload = ChatPayload {
        model: &config.model,
        messages,
        temperature: config.temperature,
        max_tokens: token_limit.filter(|_| token_field == TokenLimitField::MaxTokens),
        max_completion_tokens: token_limit
            .filter(|_| token_field == TokenLimitField::MaxCompletionTokens),
        response_format: capabilities
            .supports_structured_output
            .then(|| suggestions_schema(config.max_items())),
    };

    let body = serde_json::to_value(&payload).map_err(GenerateError::Serialization)?;

    debug!(
        model = %config.model,
        messages = messages.len(),
        token_limit = ?token_limit,
        structured = capabilities.supports_structured_output,
        "Built chat completion request"
    );

    Ok(HttpRequest {
        url: config.base_url.trim().to_string(),
        bearer_token: config.api_key.trim().to_string(),
        body,
    })
}

/// JSON-schema response format: `{"suggestions": [string; 1..=max_items]}`.
pub(crate) fn suggestions_schema(max_items: usize) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "suggestions": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                        "maxItems": max_items.max(1),
                    }
                },
                "required": ["suggestions"],
                "additionalProperties": false,
            }
        }
    })
}

pub(crate) fn parse_response(response: &HttpResponse) -> Result<Vec<String>, GenerateError> {
    if response.status.as_u16() >= 300 {
        return Err(GenerateError::backend(response.status, &response.body));
    }

    let envelope: ChatEnvelope =
        serde_json::from_str(&response.body).map_err(GenerateError::MalformedEnvelope)?;

    let choice = envelope
        .choices
        .into_iter()
        .next()
        .ok_or(GenerateError::EmptyResponse)?;

    let content = choice.message.content.unwrap_or_default();
    let content = content.trim();
    debug!(content_len = content.len(), "Received completion content");

    parse_suggestions(content)
}
