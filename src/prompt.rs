//! Prompt template loading and rendering.
//!
//! The prompt file is a plain template with no variables bound. Literal
//! braces are written doubled (`{{` / `}}`); a single-brace `{name}`
//! placeholder can never be satisfied and is rejected.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, StoryError};

/// Read the whole prompt file as UTF-8.
pub async fn load_prompt(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            debug!(path = %path.display(), bytes = text.len(), "Loaded prompt template");
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(StoryError::PromptNotFound(path.to_path_buf()))
        }
        Err(e) => Err(StoryError::io(path, e)),
    }
}

/// Render a template with no variables, unescaping doubled braces.
pub fn render_prompt(template: &str) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    output.push('{');
                    continue;
                }
                let rest = &template[index + 1..];
                return Err(match rest.find('}') {
                    Some(end) => StoryError::InvalidPrompt(format!(
                        "unresolved template variable `{{{}}}`",
                        &rest[..end]
                    )),
                    None => StoryError::InvalidPrompt(format!(
                        "unmatched `{{` at byte {index}"
                    )),
                });
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    output.push('}');
                    continue;
                }
                return Err(StoryError::InvalidPrompt(format!(
                    "unmatched `}}` at byte {index}"
                )));
            }
            other => output.push(other),
        }
    }

    if output.trim().is_empty() {
        return Err(StoryError::InvalidPrompt("prompt is empty".to_string()));
    }

    Ok(output)
}

/// Load and render the prompt in one step.
pub async fn read_prompt(path: &Path) -> Result<String> {
    let template = load_prompt(path).await?;
    render_prompt(&template)
}
