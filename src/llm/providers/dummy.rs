//! Dummy LLM provider — echoes the prompt back prefixed with `[echo]`.
//! Used for offline runs and for testing the full relay round-trip without
//! a real API key. `failing(...)` builds a variant whose every call errors,
//! for exercising the degraded-reply path.

use crate::llm::ProviderError;

#[derive(Debug, Clone, Default)]
pub struct DummyProvider {
    /// When set, every call fails with this message instead of echoing.
    fail_with: Option<String>,
}

impl DummyProvider {
    pub fn new() -> Self {
        Self { fail_with: None }
    }

    /// A provider that fails every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { fail_with: Some(message.into()) }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Some(msg) = &self.fail_with {
            return Err(ProviderError::Request(msg.clone()));
        }
        Ok(format!("[echo] {prompt}"))
    }
}
