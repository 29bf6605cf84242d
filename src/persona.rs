//! Persona prompt template.
//!
//! A persona is a plain-text template file with two required variables,
//! `{{history}}` and `{{input}}`. The template is loaded once at startup
//! and validated there — a missing variable is a config error, not a
//! silently degraded prompt. Which persona to load is configuration
//! (`[persona] template = ...`), so new personas need no code changes.

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::memory::Turn;

const HISTORY_VAR: &str = "{{history}}";
const INPUT_VAR: &str = "{{input}}";

/// Immutable persona template with validated placeholders.
#[derive(Debug, Clone)]
pub struct PersonaTemplate {
    template: String,
}

impl PersonaTemplate {
    /// Build from an in-memory template string.
    ///
    /// Fails when either `{{history}}` or `{{input}}` is absent.
    pub fn from_str(template: impl Into<String>) -> Result<Self, AppError> {
        let template = template.into();
        for var in [HISTORY_VAR, INPUT_VAR] {
            if !template.contains(var) {
                return Err(AppError::Persona(format!(
                    "template is missing the required {var} variable"
                )));
            }
        }
        Ok(Self { template })
    }

    /// Load and validate a template file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::Persona(format!("cannot read {}: {e}", path.display())))?;
        Self::from_str(text).map_err(|e| match e {
            AppError::Persona(msg) => AppError::Persona(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Fill both variables and return the prompt for one generation call.
    ///
    /// Pure — the transcript is rendered as one `Speaker: text` line per
    /// turn, in original order.
    pub fn render(&self, history: &[Turn], input: &str) -> String {
        let mut rendered_history = String::new();
        for turn in history {
            rendered_history.push_str(turn.speaker.label());
            rendered_history.push_str(": ");
            rendered_history.push_str(&turn.text);
            rendered_history.push('\n');
        }

        self.template
            .replace(HISTORY_VAR, rendered_history.trim_end())
            .replace(INPUT_VAR, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Speaker;
    use std::io::Write;

    const TEMPLATE: &str = "You are a test persona.\n\n{{history}}\nHuman: {{input}}\nAgent:";

    #[test]
    fn render_contains_input() {
        let t = PersonaTemplate::from_str(TEMPLATE).unwrap();
        let out = t.render(&[], "what is the weather");
        assert!(out.contains("what is the weather"));
        assert!(!out.contains("{{input}}"));
    }

    #[test]
    fn render_empty_history_leaves_no_variable() {
        let t = PersonaTemplate::from_str(TEMPLATE).unwrap();
        let out = t.render(&[], "hi");
        assert!(!out.contains("{{history}}"));
    }

    #[test]
    fn render_keeps_history_order() {
        let t = PersonaTemplate::from_str(TEMPLATE).unwrap();
        let history = vec![
            Turn::new(Speaker::User, "first question"),
            Turn::new(Speaker::Agent, "first answer"),
            Turn::new(Speaker::User, "second question"),
            Turn::new(Speaker::Agent, "second answer"),
        ];
        let out = t.render(&history, "third question");

        let mut last = 0;
        for text in ["first question", "first answer", "second question", "second answer"] {
            let pos = out.find(text).unwrap_or_else(|| panic!("'{text}' missing from prompt"));
            assert!(pos >= last, "'{text}' out of order");
            last = pos;
        }
        assert!(out.contains("Human: first question"));
        assert!(out.contains("Agent: first answer"));
    }

    #[test]
    fn missing_history_variable_errors() {
        let result = PersonaTemplate::from_str("Hello {{input}}");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("{{history}}"));
    }

    #[test]
    fn missing_input_variable_errors() {
        let result = PersonaTemplate::from_str("{{history}} only");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("{{input}}"));
    }

    #[test]
    fn from_file_loads_and_validates() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(TEMPLATE.as_bytes()).unwrap();
        let t = PersonaTemplate::from_file(f.path()).unwrap();
        assert!(t.render(&[], "x").contains("test persona"));
    }

    #[test]
    fn from_file_missing_errors() {
        let result = PersonaTemplate::from_file(Path::new("/nonexistent/persona.txt"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("persona error"));
    }

    #[test]
    fn from_file_invalid_template_names_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"no variables here").unwrap();
        let err = PersonaTemplate::from_file(f.path()).unwrap_err().to_string();
        assert!(err.contains(&f.path().display().to_string()));
    }
}
