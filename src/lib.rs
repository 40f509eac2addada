//! diffscribe - Commit message suggestions for staged git changes.
//!
//! # Overview
//!
//! diffscribe collects the staged change set, asks a chat-completion LLM
//! backend for candidate commit messages, and turns whatever the backend
//! replies into a clean, deduplicated list of suggestions.

pub mod error;
pub mod git;
pub mod llm;
pub mod settings;
pub mod template;

// Re-export commonly used types
pub use error::{CollectError, GenerateError, Stage, TemplateError, TransportError};
pub use llm::{GenerationConfig, GenerationContext, Provider, generate};
