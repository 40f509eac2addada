//! Rendering of user-supplied prompt templates.
//!
//! `--system-prompt` and `--user-prompt` are Handlebars templates. Values
//! are referenced by name, e.g. `{{Branch}}`, `{{FileCount}}` or
//! `{{#each Paths}}- {{this}}{{/each}}`. Output is never HTML-escaped.

use handlebars::Handlebars;
use serde::Serialize;
use tracing::warn;

use crate::error::TemplateError;
use crate::llm::{GenerationConfig, GenerationContext};
use crate::settings::{SUMMARY_PATH_LIMIT, summarize_paths};

/// Values available to prompt templates.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PromptVars {
    pub branch: String,
    pub paths: Vec<String>,
    pub file_count: usize,
    pub summary: String,
    pub diff: String,
    pub diff_length: usize,
    pub format: String,
    pub prefix: String,
    pub quantity: i32,
    pub model: String,
    pub provider: String,
    pub temperature: f64,
}

impl PromptVars {
    pub fn new(context: &GenerationContext, config: &GenerationConfig) -> Self {
        Self {
            branch: context.branch.clone(),
            paths: context.paths.clone(),
            file_count: context.paths.len(),
            summary: summarize_paths(&context.paths, SUMMARY_PATH_LIMIT),
            diff: context.diff.clone(),
            diff_length: context.diff.len(),
            format: context.format.clone(),
            prefix: context.prefix.clone(),
            quantity: config.quantity,
            model: config.model.clone(),
            provider: config.provider.clone(),
            temperature: config.temperature,
        }
    }
}

/// Render a prompt template. A blank template renders to an empty string.
pub fn render_prompt(raw: &str, vars: &PromptVars) -> Result<String, TemplateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }

    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    Ok(registry.render_template(raw, vars)?)
}

/// Render a prompt template, keeping the text as written if it is invalid.
pub fn render_or_raw(raw: &str, vars: &PromptVars) -> String {
    render_prompt(raw, vars).unwrap_or_else(|e| {
        warn!("{e}. Using the prompt as written.");
        raw.trim().to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> PromptVars {
        PromptVars {
            branch: "main".to_string(),
            paths: vec!["a.rs".to_string(), "b.rs".to_string()],
            file_count: 2,
            diff: "+x".to_string(),
            format: "Conventional".to_string(),
            quantity: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_renders_scalar_values() {
        let got = render_prompt("Branch {{Branch}}, {{Quantity}} in {{Format}}", &vars()).unwrap();
        assert_eq!(got, "Branch main, 3 in Conventional");
    }

    #[test]
    fn test_renders_path_list() {
        let got =
            render_prompt("Files ({{FileCount}}):{{#each Paths}}\n- {{this}}{{/each}}", &vars())
                .unwrap();
        assert_eq!(got, "Files (2):\n- a.rs\n- b.rs");
    }

    #[test]
    fn test_does_not_escape_html() {
        let vars = PromptVars {
            diff: "-if a < b && c > d".to_string(),
            ..vars()
        };
        assert_eq!(
            render_prompt("{{Diff}}", &vars).unwrap(),
            "-if a < b && c > d"
        );
    }

    #[test]
    fn test_conditional_prefix() {
        let template = "{{#if Prefix}}Continue: {{Prefix}}{{else}}Fresh{{/if}}";
        assert_eq!(render_prompt(template, &vars()).unwrap(), "Fresh");

        let vars = PromptVars {
            prefix: "feat: ".to_string(),
            ..vars()
        };
        assert_eq!(render_prompt(template, &vars).unwrap(), "Continue: feat: ");
    }

    #[test]
    fn test_blank_template_renders_empty() {
        assert_eq!(render_prompt("  \n", &vars()).unwrap(), "");
    }

    #[test]
    fn test_invalid_template_is_an_error() {
        assert!(matches!(
            render_prompt("{{#each Paths}}unclosed", &vars()),
            Err(TemplateError::Render(_))
        ));
    }

    #[test]
    fn test_invalid_template_falls_back_to_raw_text() {
        assert_eq!(
            render_or_raw("  {{#each Paths}}unclosed ", &vars()),
            "{{#each Paths}}unclosed"
        );
    }

    #[test]
    fn test_vars_from_context_and_config() {
        let context = GenerationContext {
            branch: "dev".to_string(),
            paths: vec!["x".into(), "y".into(), "z".into(), "w".into()],
            diff: "abc".to_string(),
            format: "short".to_string(),
            prefix: "fix: ".to_string(),
        };
        let config = GenerationConfig {
            api_key: "k".to_string(),
            provider: "openai".to_string(),
            model: "gpt-test".to_string(),
            base_url: "http://localhost".to_string(),
            temperature: 0.2,
            quantity: 4,
            max_output_tokens: 0,
            system_prompt: "s".to_string(),
            user_prompt: None,
        };

        let vars = PromptVars::new(&context, &config);
        assert_eq!(vars.file_count, 4);
        assert_eq!(vars.summary, "x, y, z…");
        assert_eq!(vars.diff_length, 3);
        assert_eq!(vars.quantity, 4);
        assert_eq!(vars.model, "gpt-test");
        assert_eq!(vars.prefix, "fix: ");
    }
}
