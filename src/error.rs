//! Error types for diffscribe modules using thiserror.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum characters of a backend error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Resolve,
    Request,
    Transport,
    Response,
    Parse,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Resolve => "resolve",
            Stage::Request => "request",
            Stage::Transport => "transport",
            Stage::Response => "response",
            Stage::Parse => "parse",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the outbound HTTP call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to LLM backend failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("LLM backend timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request was cancelled")]
    Cancelled,
}

/// Errors from commit suggestion generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid config: {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Unsupported LLM provider '{name}' (expected one of: openai, openai-compatible)")]
    UnsupportedProvider { name: String },

    #[error("Failed to serialize request payload: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("LLM backend returned {status}: {body}")]
    Backend { status: StatusCode, body: String },

    #[error("LLM backend returned no choices")]
    EmptyResponse,

    #[error("LLM backend returned a malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("Unable to parse response ({content_len} bytes of content)")]
    Parse { content_len: usize },
}

impl GenerateError {
    /// Build a backend error, trimming and truncating the body.
    pub fn backend(status: StatusCode, body: &str) -> Self {
        let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
        GenerateError::Backend { status, body }
    }

    /// The pipeline stage this error came from.
    pub fn stage(&self) -> Stage {
        match self {
            GenerateError::InvalidConfig { .. } => Stage::Validate,
            GenerateError::UnsupportedProvider { .. } => Stage::Resolve,
            GenerateError::Serialization(_) => Stage::Request,
            GenerateError::Transport(_) => Stage::Transport,
            GenerateError::Backend { .. }
            | GenerateError::EmptyResponse
            | GenerateError::MalformedEnvelope(_) => Stage::Response,
            GenerateError::Parse { .. } => Stage::Parse,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerateError::Transport(TransportError::Cancelled) => false,
            GenerateError::Transport(_) => true,
            GenerateError::Backend { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Errors from rendering a user-supplied prompt template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to render prompt template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Errors from collecting staged changes.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("No staged changes (stage files with `git add` first)")]
    NoStagedChanges,

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_mentions_status_and_body() {
        let err = GenerateError::backend(StatusCode::BAD_REQUEST, "  bad request\n");
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("bad request"));
        assert_eq!(err.stage(), Stage::Response);
    }

    #[test]
    fn test_backend_error_truncates_body() {
        let body = "x".repeat(2_000);
        match GenerateError::backend(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            GenerateError::Backend { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY_CHARS),
            other => panic!("Expected Backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_reports_length_only() {
        let err = GenerateError::Parse { content_len: 42 };
        assert_eq!(err.to_string(), "Unable to parse response (42 bytes of content)");
    }

    #[test]
    fn test_stage_of_each_variant() {
        let invalid = GenerateError::InvalidConfig {
            field: "api_key",
            reason: "api key is required",
        };
        assert_eq!(invalid.stage(), Stage::Validate);
        assert_eq!(
            GenerateError::UnsupportedProvider { name: "x".into() }.stage(),
            Stage::Resolve
        );
        assert_eq!(
            GenerateError::from(TransportError::Timeout(25)).stage(),
            Stage::Transport
        );
        assert_eq!(GenerateError::EmptyResponse.stage(), Stage::Response);
    }

    #[test]
    fn test_transient_classification() {
        assert!(GenerateError::from(TransportError::Timeout(1)).is_transient());
        assert!(!GenerateError::from(TransportError::Cancelled).is_transient());
        assert!(GenerateError::backend(StatusCode::TOO_MANY_REQUESTS, "slow down").is_transient());
        assert!(GenerateError::backend(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(!GenerateError::backend(StatusCode::UNAUTHORIZED, "").is_transient());
        assert!(!GenerateError::EmptyResponse.is_transient());
    }
}
