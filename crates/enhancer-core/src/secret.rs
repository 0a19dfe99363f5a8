//! Secret management service trait.
//!
//! Defines the interface for loading the API credential used by the
//! generation endpoint.

use crate::config::SecretConfig;

/// Service for managing secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded secrets
    /// - `Err(String)`: Failed to load (error message should not contain secrets)
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Resolves the Gemini API key, or `None` when it is not configured.
    async fn gemini_api_key(&self) -> Option<String> {
        self.load_secrets()
            .await
            .ok()
            .and_then(|config| config.gemini_api_key().map(str::to_string))
    }
}
