//! LLM backend adaptation: config, prompts, providers, transport, parsing.

mod chat;
pub mod config;
pub mod context;
pub mod generate;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod transport;

pub use config::{GenerationConfig, validate};
pub use context::{GenerationContext, Message, Role};
pub use generate::{generate, generate_with};
pub use parse::{normalize, parse_suggestions};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, build_prompt};
pub use provider::{Provider, ProviderCapabilities};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
