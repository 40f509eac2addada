//! Tolerant extraction of suggestion lists from completion text.
//!
//! Language models reliably produce near-JSON but not always strictly valid
//! JSON, so parsing is a chain of tiers tried in a fixed order. The first
//! tier that succeeds decides the result:
//!
//! 1. A JSON object with a non-empty `suggestions` array of strings.
//! 2. A bare JSON array of strings (an empty array is accepted here).
//! 3. Non-blank lines, with leading bullet markup stripped.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::GenerateError;

/// Characters treated as list bullets at the start of a line.
const BULLETS: [char; 3] = ['-', '*', '•'];

#[derive(Deserialize)]
struct SuggestionsObject {
    suggestions: Vec<String>,
}

/// Parse completion text into raw (un-normalized) suggestions.
pub fn parse_suggestions(text: &str) -> Result<Vec<String>, GenerateError> {
    let content = strip_code_fence(text);

    if let Ok(object) = serde_json::from_str::<SuggestionsObject>(content)
        && !object.suggestions.is_empty()
    {
        return Ok(object.suggestions);
    }

    if let Ok(array) = serde_json::from_str::<Vec<String>>(content) {
        return Ok(array);
    }

    let lines: Vec<String> = content
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(GenerateError::Parse {
            content_len: text.len(),
        });
    }

    Ok(lines)
}

/// Trim entries, drop blanks, and remove duplicates keeping first occurrence.
pub fn normalize<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        let cleaned = item.as_ref().trim();
        if cleaned.is_empty() || !seen.insert(cleaned.to_string()) {
            continue;
        }
        out.push(cleaned.to_string());
    }

    out
}

fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(BULLETS).trim()
}

/// Unwrap a reply that is entirely one markdown code fence.
///
/// Handles both ` ```json ` and bare ` ``` ` fences. Anything else is
/// returned trimmed but otherwise untouched.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // The opening line only carries the info string (`json`, `json title`).
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner.trim(),
    }
}
