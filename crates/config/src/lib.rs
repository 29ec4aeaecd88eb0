//! Configuration loading, validation, and management for ragloop.
//!
//! Loads configuration from a TOML file with environment variable overrides
//! for secrets. Validates all settings at startup; the loaded `AppConfig` is
//! immutable afterwards and injected into the components that need it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Backend service endpoints
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Turn orchestration settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("backends", &self.backends)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Completion provider connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; usually supplied via `RAGLOOP_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible chat-completions API
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Provider calls run the model; they get the long timeout.
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".into()
}
fn default_model() -> String {
    "qwen-plus".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_provider_timeout() -> u64 {
    120
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

/// Base URLs of the backend services the tools call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_session_url")]
    pub session_url: String,

    #[serde(default = "default_memory_url")]
    pub memory_url: String,

    #[serde(default = "default_knowledge_url")]
    pub knowledge_url: String,

    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    #[serde(default = "default_web_search_url")]
    pub web_search_url: String,

    /// Tool backends answer metadata lookups; they get the short timeout.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_session_url() -> String {
    "http://127.0.0.1:8081".into()
}
fn default_memory_url() -> String {
    "http://127.0.0.1:8082".into()
}
fn default_knowledge_url() -> String {
    "http://127.0.0.1:8083".into()
}
fn default_weather_url() -> String {
    "http://127.0.0.1:8084".into()
}
fn default_web_search_url() -> String {
    "http://127.0.0.1:8085".into()
}
fn default_backend_timeout() -> u64 {
    10
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            session_url: default_session_url(),
            memory_url: default_memory_url(),
            knowledge_url: default_knowledge_url(),
            weather_url: default_weather_url(),
            web_search_url: default_web_search_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// Turn orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-invocation rounds per turn before the loop finalizes
    /// with a partial answer.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Prior turns fetched into the history window.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Delivery chunk size in characters.
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,

    /// Override the built-in system prompt entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_max_tool_rounds() -> u32 {
    8
}
fn default_history_turns() -> usize {
    10
}
fn default_chunk_chars() -> usize {
    24
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            history_turns: default_history_turns(),
            chunk_chars: default_chunk_chars(),
            system_prompt_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path, then apply environment overrides.
    ///
    /// Environment variables:
    /// - `RAGLOOP_API_KEY` — provider API key
    /// - `RAGLOOP_MODEL` — provider model name
    /// - `RAGLOOP_PROVIDER_URL` — provider base URL
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            tracing::info!("No config file found at {}, using defaults", path.display());
            Self::default()
        };

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var("RAGLOOP_API_KEY").ok();
        }
        if let Ok(model) = std::env::var("RAGLOOP_MODEL") {
            config.provider.model = model;
        }
        if let Ok(url) = std::env::var("RAGLOOP_PROVIDER_URL") {
            config.provider.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_rounds must be at least 1".into(),
            ));
        }

        if self.agent.chunk_chars == 0 {
            return Err(ConfigError::ValidationError(
                "agent.chunk_chars must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if a provider API key is available.
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            backends: BackendsConfig::default(),
            agent: AgentConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
