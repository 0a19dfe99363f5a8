//! Secret service implementation.
//!
//! Resolves the Gemini API key from (highest first) an explicit override,
//! the `GEMINI_API_KEY` / `API_KEY` environment variables, then
//! `secret.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use enhancer_core::config::{GeminiConfig, SecretConfig};
use enhancer_core::error::Result;
use enhancer_core::secret::SecretService;

use crate::paths::{EnhancerPaths, PathError};

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Service for resolving secret configuration.
///
/// Only reads `secret.json`; the template is written by
/// `EnhancerPaths::ensure_secret_file`. The merged result is cached after
/// the first load to avoid repeated file I/O.
///
/// # Example
///
/// ```ignore
/// use enhancer_infrastructure::SecretServiceImpl;
/// use enhancer_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(&EnhancerPaths::default())?;
/// let key = service.gemini_api_key().await;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    api_key_override: Option<String>,
    /// Cached merged secret config.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service reading `secret.json` from the resolved config dir.
    pub fn new(paths: &EnhancerPaths) -> std::result::Result<Self, PathError> {
        Ok(Self::with_path(paths.secret_file()?))
    }

    /// Creates a service over an explicit secret file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            api_key_override: None,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets a key that wins over the environment and the file (the
    /// `--api-key` flag).
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        self.api_key_override = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_merged(&self) -> SecretConfig {
        if let Ok(read_lock) = self.secrets.read() {
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let file_config = match read_secret_file(&self.path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("[SecretService] No secret file at {}", self.path.display());
                SecretConfig::default()
            }
            Err(e) => {
                // A broken secret.json must not hide a key supplied by env/flag
                tracing::warn!(
                    "[SecretService] Ignoring unreadable secret file {}: {}",
                    self.path.display(),
                    e
                );
                SecretConfig::default()
            }
        };

        let env_key = env_api_key(|name| std::env::var(name).ok());
        let merged = merge_api_key(file_config, self.api_key_override.clone(), env_key);

        if let Ok(mut write_lock) = self.secrets.write() {
            *write_lock = Some(merged.clone());
        }

        merged
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> std::result::Result<SecretConfig, String> {
        Ok(self.load_merged())
    }
}

/// Reads and parses `secret.json`. `Ok(None)` when the file is absent.
fn read_secret_file(path: &Path) -> Result<Option<SecretConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// First non-blank value among [`API_KEY_ENV_VARS`].
fn env_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
}

/// Applies the key precedence: override, then env, then file.
///
/// Blank values at any level are treated as absent.
fn merge_api_key(
    mut file_config: SecretConfig,
    override_key: Option<String>,
    env_key: Option<String>,
) -> SecretConfig {
    let winning = override_key
        .into_iter()
        .chain(env_key)
        .find(|key| !key.trim().is_empty());

    if let Some(api_key) = winning {
        let model_name = file_config
            .gemini
            .as_ref()
            .and_then(|gemini| gemini.model_name.clone());
        file_config.gemini = Some(GeminiConfig {
            api_key,
            model_name,
        });
    }

    file_config
}
