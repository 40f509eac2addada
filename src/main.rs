//! diffscribe - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use diffscribe::git::{collect_staged, open_repository};
use diffscribe::llm::{DEFAULT_SYSTEM_PROMPT, GenerationConfig, GenerationContext, generate};
use diffscribe::settings::{
    DEFAULT_BASE_URL, DEFAULT_FORMAT, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_PROVIDER,
    DEFAULT_QUANTITY, DEFAULT_TEMPERATURE, fallback_candidates, resolve_api_key,
};
use diffscribe::template::{PromptVars, render_or_raw};
use diffscribe::{CollectError, GenerateError, Stage, TransportError};

/// Exit code used when no suggestion could be produced.
const EXIT_NO_SUGGESTIONS: u8 = 10;

/// Suggest commit messages for staged changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "diffscribe")]
#[command(about = "Suggest commit messages for staged changes using an LLM")]
#[command(version)]
struct Cli {
    /// Commit message text typed so far; every suggestion continues from it
    prefix: Option<String>,

    /// Description of the desired commit message format
    #[arg(long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// LLM API key (falls back to DIFFSCRIBE_API_KEY, then OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// LLM provider (openai, openai-compatible)
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// Model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat completions endpoint URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Number of suggestions to request
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUANTITY, allow_negative_numbers = true)]
    quantity: i32,

    /// Max output tokens to request (0 = backend default)
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS, allow_negative_numbers = true)]
    max_output_tokens: i32,

    /// System prompt template (Handlebars, e.g. {{Branch}}, {{Format}})
    #[arg(long)]
    system_prompt: Option<String>,

    /// User prompt template replacing the built-in prompt
    #[arg(long)]
    user_prompt: Option<String>,

    /// Maximum number of suggestions to print (0 = no limit)
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Fail instead of printing generic suggestions when the LLM call fails
    #[arg(long)]
    no_fallback: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Attach the requested format and prefix to the collected changes.
    fn describe(&self, context: &mut GenerationContext) {
        context.format = self.format.clone();
        context.prefix = self.prefix.clone().unwrap_or_default();
    }

    fn generation_config(&self, context: &GenerationContext) -> GenerationConfig {
        let mut config = GenerationConfig {
            api_key: resolve_api_key(self.api_key.as_deref()).unwrap_or_default(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            quantity: self.quantity,
            max_output_tokens: self.max_output_tokens,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: None,
        };

        let vars = PromptVars::new(context, &config);
        if let Some(raw) = &self.system_prompt {
            config.system_prompt = render_or_raw(raw, &vars);
        }
        config.user_prompt = self.user_prompt.as_deref().map(|raw| render_or_raw(raw, &vars));
        config
    }
}

/// What the binary reports for one run.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Print(Vec<String>),
    NoSuggestions,
}

impl Outcome {
    fn emit(self) -> ExitCode {
        match self {
            Outcome::Print(candidates) => {
                for candidate in &candidates {
                    println!("{candidate}");
                }
                ExitCode::SUCCESS
            }
            Outcome::NoSuggestions => {
                eprintln!("diffscribe: no suggestions");
                ExitCode::from(EXIT_NO_SUGGESTIONS)
            }
        }
    }
}

/// Staged changes to describe, or `None` when nothing is staged.
fn staged_changes(
    collected: Result<GenerationContext, CollectError>,
) -> Result<Option<GenerationContext>> {
    match collected {
        Ok(context) => Ok(Some(context)),
        Err(CollectError::NoStagedChanges) => {
            warn!("{}", CollectError::NoStagedChanges);
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to collect staged changes"),
    }
}

/// Whether generic suggestions may stand in for a failed LLM call.
///
/// Only failures of the call itself qualify. Configuration mistakes and
/// user cancellation are reported instead.
fn falls_back(error: &GenerateError) -> bool {
    match error {
        GenerateError::Transport(TransportError::Cancelled) => false,
        e => matches!(e.stage(), Stage::Transport | Stage::Response | Stage::Parse),
    }
}

fn surface(error: GenerateError) -> anyhow::Error {
    let message = match &error {
        GenerateError::InvalidConfig {
            field: "api_key", ..
        } => "api_key is required (set --api-key or DIFFSCRIBE_API_KEY/OPENAI_API_KEY)".to_string(),
        e => format!("LLM {} stage failed", e.stage()),
    };
    anyhow::Error::new(error).context(message)
}

/// Turn a generation result into what gets printed.
fn select_candidates(
    result: Result<Vec<String>, GenerateError>,
    context: &GenerationContext,
    cli: &Cli,
) -> Result<Outcome> {
    let mut candidates = match result {
        Ok(candidates) if !candidates.is_empty() || cli.no_fallback => candidates,
        Ok(_) => {
            warn!("LLM returned no suggestions. Using generic suggestions.");
            fallback_candidates(context)
        }
        Err(e) if cli.no_fallback || !falls_back(&e) => return Err(surface(e)),
        Err(e) => {
            if e.is_transient() {
                warn!(stage = %e.stage(), "LLM error: {e}. Retrying later may help. Using generic suggestions.");
            } else {
                warn!(stage = %e.stage(), "LLM error: {e}. Using generic suggestions.");
            }
            fallback_candidates(context)
        }
    };

    if candidates.is_empty() {
        return Ok(Outcome::NoSuggestions);
    }
    if cli.top > 0 {
        candidates.truncate(cli.top);
    }
    Ok(Outcome::Print(candidates))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "diffscribe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Step 1: Collect staged changes
    let repo = open_repository(".")
        .context("Not a git repository. Run diffscribe from within a git repository.")?;
    let Some(mut context) = staged_changes(collect_staged(&repo))? else {
        return Ok(Outcome::NoSuggestions.emit());
    };
    cli.describe(&mut context);

    // Step 2: Ask the backend, cancelling on Ctrl-C
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let config = cli.generation_config(&context);
    let result = generate(&context, &config, &cancel).await;

    // Step 3: Print
    Ok(select_candidates(result, &context, &cli)?.emit())
}
