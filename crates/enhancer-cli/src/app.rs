//! Wiring of services for one CLI invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use enhancer_application::{AuthService, HistoryManager, PromptEnhancer, SessionContext};
use enhancer_core::config::AppConfig;
use enhancer_core::secret::SecretService;
use enhancer_core::storage::{KeyValueStore, MemoryStore};
use enhancer_infrastructure::{ConfigService, EnhancerPaths, JsonFileStore, SecretServiceImpl};
use enhancer_interaction::GeminiApiAgent;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub ephemeral: bool,
}

/// Services and session state for the running process.
pub struct App {
    pub paths: EnhancerPaths,
    pub config: AppConfig,
    pub enhancer: PromptEnhancer,
    pub history: HistoryManager,
    pub auth: AuthService,
    pub session: SessionContext,
}

/// Loads `.env` from the config dir, else from the working directory.
pub fn load_dotenv(paths: &EnhancerPaths) {
    match paths.env_file() {
        Ok(path) if path.exists() => {
            let _ = dotenvy::from_path(&path);
        }
        _ => {
            let _ = dotenvy::dotenv();
        }
    }
}

/// Reads `config.toml`, creating a default one on first run.
pub fn load_config(paths: &EnhancerPaths, ephemeral: bool) -> AppConfig {
    let Ok(path) = paths.config_file() else {
        return AppConfig::default();
    };

    let service = ConfigService::new(path);
    if !ephemeral {
        if let Err(e) = service.ensure_config_file() {
            eprintln!("Warning: could not create {}: {}", service.path().display(), e);
        }
    }
    service.get_config()
}

impl App {
    pub async fn build(paths: EnhancerPaths, config: AppConfig, options: &GlobalOptions) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if options.ephemeral {
            tracing::info!("[App] Ephemeral run, nothing is persisted");
            Arc::new(MemoryStore::new())
        } else {
            let dir = paths
                .store_dir()
                .context("Could not determine the data directory")?;
            Arc::new(JsonFileStore::new(dir))
        };

        if !options.ephemeral {
            if let Err(e) = paths.ensure_secret_file() {
                tracing::warn!("[App] Could not create secret.json template: {}", e);
            }
        }

        let secrets = SecretServiceImpl::new(&paths)
            .context("Could not determine the config directory")?
            .with_api_key_override(options.api_key.clone());
        let secret_config = secrets.load_secrets().await.unwrap_or_default();

        let model = secret_config
            .gemini_model_name()
            .unwrap_or(&config.model)
            .to_string();
        let agent = GeminiApiAgent::from_secret_service(&secrets)
            .await
            .with_base_url(&config.base_url);
        let enhancer = PromptEnhancer::new(Arc::new(agent)).with_model(model);
        tracing::debug!("[App] Using model {}", enhancer.model());

        Ok(Self {
            history: HistoryManager::new(config.history_enabled),
            auth: AuthService::new(),
            session: SessionContext::load(store),
            enhancer,
            paths,
            config,
        })
    }

    /// Label for the active history scope, for display.
    pub fn scope_label(&self) -> String {
        match self.session.current_user() {
            Some(user) => user.email.clone(),
            None => "local".to_string(),
        }
    }
}
