use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, TranslatorError};

/// Environment variable overriding the completion service model name
pub const ENV_MODEL_NAME: &str = "OPEN_AI_MODEL_NAME";
/// Environment variable overriding the completion service base URL
pub const ENV_HOST: &str = "OPEN_AI_HOST";
/// Environment variable overriding the completion service API key
pub const ENV_KEY: &str = "OPEN_AI_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP service binds to
    pub host: String,
    /// Port the HTTP service listens on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible completion service (no trailing path)
    pub host: String,
    /// Model name sent with every completion request
    pub model: String,
    /// Bearer token for the completion service
    pub api_key: String,
    /// Request timeout in seconds; unset keeps the HTTP client default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Heuristic used to flag segments for translation
    #[serde(default)]
    pub policy: DetectionPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionPolicy {
    /// Arabic: flag text containing any character of the Unicode Arabic script
    #[default]
    Arabic,
    /// NonAscii: flag text containing any code point above 127
    NonAscii,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            host: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslatorError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TranslatorError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslatorError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Override the completion section from `OPEN_AI_*` variables.
    ///
    /// `lookup` is usually `|name| std::env::var(name).ok()`; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty(ENV_HOST) {
            self.completion.host = host;
        }
        if let Some(model) = non_empty(ENV_MODEL_NAME) {
            self.completion.model = model;
        }
        if let Some(key) = non_empty(ENV_KEY) {
            self.completion.api_key = key;
        }
    }

    /// Reject values that can never produce a working service.
    pub fn validate(&self) -> Result<()> {
        if self.completion.host.trim().is_empty() {
            return Err(TranslatorError::Config("completion.host must not be empty".to_string()));
        }
        if self.completion.model.trim().is_empty() {
            return Err(TranslatorError::Config("completion.model must not be empty".to_string()));
        }
        if self.completion.timeout_secs == Some(0) {
            return Err(TranslatorError::Config("completion.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
