//! Configuration domain models.
//!
//! `AppConfig` is read from `config.toml`, `SecretConfig` from `secret.json`.

use serde::{Deserialize, Serialize};

/// Default Gemini model used by both pipeline stages.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default log filter when neither `RUST_LOG` nor config provides one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration stored in `config.toml`.
///
/// Every field is optional in the file; missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model identifier sent to the generation endpoint.
    pub model: String,
    /// Base URL of the generation endpoint.
    pub base_url: String,
    /// Tracing filter directive (e.g. "info", "enhancer_application=debug").
    pub log_level: String,
    /// Whether successful enhancements are recorded in history.
    pub history_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            history_enabled: true,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl SecretConfig {
    /// Returns the Gemini API key when one is present and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|gemini| gemini.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    /// Returns the model override from `secret.json`, if set.
    pub fn gemini_model_name(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .and_then(|gemini| gemini.model_name.as_deref())
            .filter(|model| !model.trim().is_empty())
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}
