//! Defaults, API key lookup, and non-LLM fallback suggestions.

use std::env;

use crate::llm::GenerationContext;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_QUANTITY: i32 = 5;
pub const DEFAULT_MAX_OUTPUT_TOKENS: i32 = 512;
pub const DEFAULT_FORMAT: &str = "Conventional Commit style (prefix + summary)";

/// Environment variables consulted for the API key, in priority order.
const API_KEY_ENV_VARS: [&str; 2] = ["DIFFSCRIBE_API_KEY", "OPENAI_API_KEY"];

/// Number of paths named in fallback suggestions.
pub(crate) const SUMMARY_PATH_LIMIT: usize = 3;

/// Resolve the API key: explicit flag, then `DIFFSCRIBE_API_KEY`, then
/// `OPENAI_API_KEY`. Blank values are skipped.
pub fn resolve_api_key(flag: Option<&str>) -> Option<String> {
    flag.map(str::to_string)
        .into_iter()
        .chain(API_KEY_ENV_VARS.iter().filter_map(|var| env::var(var).ok()))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Deterministic suggestions used when the backend cannot be reached.
pub fn fallback_candidates(context: &GenerationContext) -> Vec<String> {
    let summary = summarize_paths(&context.paths, SUMMARY_PATH_LIMIT);
    vec![
        format!("feat: {summary}"),
        format!("fix: address issues in {}", context.branch),
        format!("chore: update {summary}"),
        format!("refactor: simplify {summary}"),
        format!("docs: update docs for {summary}"),
    ]
}

pub(crate) fn summarize_paths(paths: &[String], limit: usize) -> String {
    match paths.len() {
        0 => "changes".to_string(),
        n if n <= limit => paths.join(", "),
        _ => format!("{}…", paths[..limit].join(", ")),
    }
}
