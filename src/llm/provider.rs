//! Backend selection and the per-backend adapter surface.

use std::fmt;
use std::str::FromStr;

use crate::error::GenerateError;

use super::chat::{self, TokenLimitField};
use super::config::GenerationConfig;
use super::context::Message;
use super::transport::{HttpRequest, HttpResponse};

/// Optional features a backend honors. Unsupported settings are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    pub supports_structured_output: bool,
    pub supports_max_output_tokens: bool,
}

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat completions, with JSON-schema constrained output.
    OpenAi,
    /// Servers speaking the chat-completions dialect without schema support
    /// (Ollama, llama.cpp, vLLM, ...).
    OpenAiCompatible,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::OpenAiCompatible => "openai-compatible",
        }
    }

    /// Resolve a provider from its configured name (trimmed, case-insensitive).
    pub fn resolve(name: &str) -> Result<Self, GenerateError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "openai-compatible" | "ollama" | "local" => Ok(Provider::OpenAiCompatible),
            _ => Err(GenerateError::UnsupportedProvider {
                name: name.to_string(),
            }),
        }
    }

    pub fn capabilities(&self) -> ProviderCapabilities {
        match self {
            Provider::OpenAi => ProviderCapabilities {
                supports_structured_output: true,
                supports_max_output_tokens: true,
            },
            Provider::OpenAiCompatible => ProviderCapabilities {
                supports_structured_output: false,
                supports_max_output_tokens: true,
            },
        }
    }

    /// Shape the outbound request for this backend.
    pub fn build_request(
        &self,
        config: &GenerationConfig,
        messages: &[Message],
    ) -> Result<HttpRequest, GenerateError> {
        let token_field = match self {
            Provider::OpenAi => TokenLimitField::MaxCompletionTokens,
            Provider::OpenAiCompatible => TokenLimitField::MaxTokens,
        };
        chat::build_request(config, messages, self.capabilities(), token_field)
    }

    /// Turn the backend reply into raw suggestions.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<Vec<String>, GenerateError> {
        match self {
            Provider::OpenAi | Provider::OpenAiCompatible => chat::parse_response(response),
        }
    }
}

impl FromStr for Provider {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::resolve(s)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
