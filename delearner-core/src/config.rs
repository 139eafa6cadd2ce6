//! Configuration for the analysis core
//!
//! Loaded from a TOML file when one is given; every field has a default so a missing
//! file or a partial file both work. The backend credential itself never lives in the
//! file, only the name of the environment variable that holds it.

use crate::error::{CoreError, Result};
use crate::llm::{LLMError, default_model};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default environment variable holding the backend credential
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Default REST endpoint of the generation backend
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default lifetime of a transient line highlight
pub const DEFAULT_HIGHLIGHT_MS: u64 = 2500;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelearnerConfig {
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

impl DelearnerConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CoreError::config(format!("failed to parse config: {}", e)))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::config(format!("failed to serialize config: {}", e)))
    }
}

/// Generation backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Environment variable that holds the API credential
    pub api_key_env: String,

    /// Base URL of the REST API
    pub base_url: String,

    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the credential from the process environment
    pub fn resolve_api_key(&self) -> std::result::Result<String, LLMError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Read the credential through `lookup`; a missing or blank value is an error
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> std::result::Result<String, LLMError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(LLMError::config(format!(
                "{} environment variable not set",
                self.api_key_env
            ))),
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Model used until the user picks another one
    pub default_model: String,

    /// How long a transient line highlight stays visible
    pub highlight_duration_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_model: default_model().to_string(),
            highlight_duration_ms: DEFAULT_HIGHLIGHT_MS,
        }
    }
}

impl SessionConfig {
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}
