//! Gemini text-generation provider (`models/{model}:generateContent`).
//!
//! Exposes a single `complete(&str) -> String` interface matching the rest
//! of the `LlmProvider` abstraction. All Gemini wire types are private to
//! this module — callers never see them. Conversation history and persona
//! framing are the agent's responsibility; this provider is stateless and
//! sends the already-rendered prompt as one user part.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::llm::ProviderError;

// ── Public provider ───────────────────────────────────────────────────────────

/// Adapter for the Generative Language REST API.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally. The request timeout is set on
/// the client, so a hung call surfaces as a transport error.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Build a provider from config values and an optional API key.
    ///
    /// `api_key` may be `None` so the process can still start without a
    /// credential; each `complete` call then fails with a clear error.
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, model, temperature, api_key })
    }

    /// Send the rendered prompt and return the generated text.
    ///
    /// One round-trip only — no retries here.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::Request("missing API key — set GEMINI_API_KEY".to_string())
        })?;

        let url = format!(
            "{}/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig { temperature: self.temperature },
        };

        debug!(
            model = %self.model,
            temperature = self.temperature,
            prompt_len = prompt.len(),
            "sending generation request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full generation request payload");
        }

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "generation HTTP request failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response.json::<GenerateContentResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize generation response");
            ProviderError::Request(format!("failed to parse response body: {e}"))
        })?;

        debug!(candidates = parsed.candidates.len(), "received generation response");

        extract_text(parsed)
    }
}

/// Pull the first candidate's text out of a parsed response.
fn extract_text(parsed: GenerateContentResponse) -> Result<String, ProviderError> {
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::Request("empty or missing content in response".into()))
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

// Error envelope used by the Generative Language API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let api_status = env
            .error
            .status
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        format!("HTTP {status}{api_status}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    };

    error!(%status, %message, "generation request returned HTTP error");
    Err(ProviderError::Request(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(key: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(
            "https://generativelanguage.googleapis.com/v1beta/models".into(),
            "gemini-2.5-flash".into(),
            0.7,
            1,
            key.map(str::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let err = provider(None).complete("hello").await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn response_text_extracted() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ {"text": "Hey! "}, {"text": "How are you?"} ], "role": "model" } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Hey! How are you?");
    }

    #[test]
    fn empty_candidates_rejected() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        let err = extract_text(parsed).unwrap_err();
        assert!(err.to_string().contains("empty or missing content"));
    }

    #[test]
    fn blank_text_rejected() {
        let body = r#"{
            "candidates": [ { "content": { "parts": [ {"text": "   "} ] } } ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(extract_text(parsed).is_err());
    }

    #[test]
    fn candidate_without_content_rejected() {
        // Safety-blocked candidates come back with no content at all.
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [ { "finishReason": "SAFETY" } ]}"#).unwrap();
        assert!(extract_text(parsed).is_err());
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        let env: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(env.error.message, "API key not valid");
        assert_eq!(env.error.status.as_deref(), Some("PERMISSION_DENIED"));
    }

    #[test]
    fn request_payload_shape() {
        let payload = GenerateContentRequest {
            contents: vec![Content { parts: vec![RequestPart { text: "hi".into() }] }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json["generationConfig"]["temperature"].is_number());
    }
}
