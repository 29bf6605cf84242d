//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `PORT` and `CHAT_RELAY_LOG_LEVEL` env overrides.
//! The provider credential comes from `GEMINI_API_KEY` — never from TOML.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// Gemini provider configuration.
/// Populated from `[llm.gemini]` in the TOML.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the models endpoint; the model name and `:generateContent`
    /// are appended per request.
    pub api_base_url: String,
    /// Model name inserted into the request path.
    pub model: String,
    /// Sampling temperature, 0.0–1.0.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (e.g. `"dummy"`, `"gemini"`).
    /// Maps to `default` in `[llm]` TOML — named `default` there to signal
    /// that other provider sections can coexist without being loaded.
    pub provider: String,
    /// Config for the Gemini provider (`[llm.gemini]`).
    pub gemini: GeminiConfig,
}

/// Persona configuration.
#[derive(Debug, Clone)]
pub struct PersonaConfig {
    /// Path to the persona template file, relative to the working directory.
    pub template: PathBuf,
}

/// Conversation memory configuration.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Optional FIFO bound on transcript turns; unbounded when `None`.
    pub transcript_cap: Option<usize>,
}

/// Fully-resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    /// Socket address the HTTP listener binds to.
    pub bind: String,
    pub persona: PersonaConfig,
    pub memory: MemoryConfig,
    pub llm: LlmConfig,
    /// API key from `GEMINI_API_KEY` env var — `None` when unset.
    /// Never sourced from TOML.
    pub llm_api_key: Option<String>,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    relay: RawRelay,
    #[serde(default)]
    persona: RawPersona,
    #[serde(default)]
    memory: RawMemory,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawRelay {
    bot_name: String,
    log_level: String,
    #[serde(default = "default_bind")]
    bind: String,
}

#[derive(Deserialize)]
struct RawPersona {
    #[serde(default = "default_persona_template")]
    template: String,
}

impl Default for RawPersona {
    fn default() -> Self {
        Self { template: default_persona_template() }
    }
}

#[derive(Deserialize, Default)]
struct RawMemory {
    transcript_cap: Option<usize>,
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    gemini: RawGeminiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), gemini: RawGeminiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawGeminiConfig {
    #[serde(default = "default_gemini_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_gemini_model")]
    model: String,
    #[serde(default = "default_gemini_temperature")]
    temperature: f32,
    #[serde(default = "default_gemini_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawGeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_gemini_api_base_url(),
            model: default_gemini_model(),
            temperature: default_gemini_temperature(),
            timeout_seconds: default_gemini_timeout_seconds(),
        }
    }
}

fn default_bind() -> String { "0.0.0.0:8501".to_string() }
fn default_persona_template() -> String { "config/personas/tuhina.txt".to_string() }
fn default_llm_provider() -> String { "gemini".to_string() }
fn default_gemini_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}
fn default_gemini_model() -> String { "gemini-2.5-flash".to_string() }
fn default_gemini_temperature() -> f32 { 0.7 }
fn default_gemini_timeout_seconds() -> u64 { 60 }

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let port_override = env::var("PORT").ok();
    let log_level_override = env::var("CHAT_RELAY_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        port_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    port_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = log_level_override.unwrap_or(&parsed.relay.log_level).to_string();

    let bind = match port_override {
        Some(port) => apply_port(&parsed.relay.bind, port)?,
        None => parsed.relay.bind,
    };

    let temperature = parsed.llm.gemini.temperature;
    if !(0.0..=1.0).contains(&temperature) {
        return Err(AppError::Config(format!(
            "llm.gemini.temperature must be within 0.0–1.0, got {temperature}"
        )));
    }

    Ok(Config {
        bot_name: parsed.relay.bot_name,
        log_level,
        bind,
        persona: PersonaConfig {
            template: PathBuf::from(parsed.persona.template),
        },
        memory: MemoryConfig {
            transcript_cap: parsed.memory.transcript_cap,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            gemini: GeminiConfig {
                api_base_url: parsed.llm.gemini.api_base_url,
                model: parsed.llm.gemini.model,
                temperature,
                timeout_seconds: parsed.llm.gemini.timeout_seconds,
            },
        },
        llm_api_key: env::var("GEMINI_API_KEY").ok(),
    })
}

/// Replace the port part of a `host:port` bind address.
fn apply_port(bind: &str, port: &str) -> Result<String, AppError> {
    port.parse::<u16>()
        .map_err(|_| AppError::Config(format!("PORT must be a number 0–65535, got '{port}'")))?;
    let host = bind.rsplit_once(':').map(|(h, _)| h).unwrap_or(bind);
    Ok(format!("{host}:{port}"))
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            bot_name: "test".into(),
            log_level: "info".into(),
            bind: "127.0.0.1:0".into(),
            persona: PersonaConfig {
                template: PathBuf::from("config/personas/tuhina.txt"),
            },
            memory: MemoryConfig { transcript_cap: None },
            llm: LlmConfig {
                provider: "dummy".into(),
                gemini: GeminiConfig {
                    api_base_url: "http://localhost:0/v1beta/models".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
        }
    }
}
