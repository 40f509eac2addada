//! End-to-end generation: validate, prompt, call the backend, parse, normalize.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{GenerateError, TransportError};

use super::config::{GenerationConfig, validate};
use super::context::{GenerationContext, Message};
use super::parse::normalize;
use super::prompt::build_prompt;
use super::provider::Provider;
use super::transport::{HttpTransport, Transport};

/// Generate commit message suggestions for the staged changes.
///
/// Performs exactly one backend call through a fresh [`HttpTransport`].
/// Fails fast at the first failing stage; no retries are attempted and no
/// partial list is ever returned with an error. Triggering `cancel` before
/// or during the call yields [`TransportError::Cancelled`].
pub async fn generate(
    context: &GenerationContext,
    config: &GenerationConfig,
    cancel: &CancellationToken,
) -> Result<Vec<String>, GenerateError> {
    validate(config)?;
    let transport = HttpTransport::new()?;
    run(&transport, context, config, cancel).await
}

/// Same as [`generate`] but over a caller-supplied transport.
pub async fn generate_with<T: Transport + ?Sized>(
    transport: &T,
    context: &GenerationContext,
    config: &GenerationConfig,
    cancel: &CancellationToken,
) -> Result<Vec<String>, GenerateError> {
    validate(config)?;
    run(transport, context, config, cancel).await
}

async fn run<T: Transport + ?Sized>(
    transport: &T,
    context: &GenerationContext,
    config: &GenerationConfig,
    cancel: &CancellationToken,
) -> Result<Vec<String>, GenerateError> {
    let provider = Provider::resolve(&config.provider)?;

    let prompt = match config.user_prompt() {
        Some(prompt) => prompt.to_string(),
        None => build_prompt(context, config.max_items()),
    };
    debug!(
        %provider,
        model = %config.model,
        prompt_len = prompt.len(),
        "Generating commit suggestions"
    );

    let messages = [
        Message::system(config.system_prompt.as_str()),
        Message::user(prompt),
    ];
    let request = provider.build_request(config, &messages)?;

    if cancel.is_cancelled() {
        return Err(TransportError::Cancelled.into());
    }
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(TransportError::Cancelled.into()),
        result = transport.send(request) => result?,
    };

    let raw = provider.parse_response(&response)?;
    let suggestions = normalize(raw);
    debug!(count = suggestions.len(), "Parsed commit suggestions");

    Ok(suggestions)
}
