//! Configuration service implementation.
//!
//! Loads `AppConfig` from `config.toml` and caches it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use enhancer_core::config::AppConfig;
use enhancer_core::error::{EnhancerError, Result};

/// Configuration service that loads and caches the application configuration.
///
/// A missing file yields defaults; an unparsable file is reported with a
/// warning and also yields defaults, so a typo never blocks the tool.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a service for the config file at `path`.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the path to the config file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> AppConfig {
        if let Ok(read_lock) = self.config.read() {
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match self.load_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Using defaults, failed to load {}: {}",
                    self.path.display(),
                    e
                );
                AppConfig::default()
            }
        };

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Writes a default config file when none exists yet.
    pub fn ensure_config_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&AppConfig::default())?;
        fs::write(&self.path, content)?;
        tracing::info!("[ConfigService] Created default config at {}", self.path.display());
        Ok(())
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        toml::from_str(&content).map_err(EnhancerError::from)
    }
}
