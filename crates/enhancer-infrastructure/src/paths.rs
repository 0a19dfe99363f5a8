//! Unified path management for prompt-enhancer files.
//!
//! All configuration, secrets, logs and stored state are resolved here so
//! every service agrees on locations across platforms.

use std::path::{Path, PathBuf};

use enhancer_core::config::{GeminiConfig, SecretConfig};

/// Application directory name under the platform config/data directories.
pub const APP_DIR_NAME: &str = "prompt-enhancer";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for prompt-enhancer.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/prompt-enhancer/        # Config directory
/// ├── config.toml                   # Application configuration
/// ├── secret.json                   # API key
/// ├── .env                          # Optional environment overrides
/// └── logs/                         # Application logs
///     └── prompt-enhancer.log.YYYY-MM-DD
///
/// ~/.local/share/prompt-enhancer/   # Data directory
/// └── store/                        # Key-value store (one JSON file per key)
/// ```
///
/// With a base path (`--data-dir` / `PROMPT_ENHANCER_HOME`) both trees are
/// rooted at that directory instead.
#[derive(Debug, Clone, Default)]
pub struct EnhancerPaths {
    base: Option<PathBuf>,
}

impl EnhancerPaths {
    /// Creates a resolver. `base_path` overrides the platform directories.
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/prompt-enhancer/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (stored state).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to secret.json.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the path to the optional `.env` file.
    pub fn env_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(".env"))
    }

    /// Returns the key-value store directory.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }

    /// Returns the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template carries an empty Gemini key and no model override.
    /// On Unix the file mode is set to 600 (user read/write only).
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: None,
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
