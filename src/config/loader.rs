use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::UiError;

use super::{paths, Config};

impl Config {
    /// Load configuration from config.json in the app directory
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = match paths::get_config_path() {
            Ok(path) => path,
            Err(err) => {
                warn!(error = ?err, "Failed to locate config.json, using defaults");
                return Self::default();
            }
        };
        Self::load_from(&config_path).await
    }

    /// Same as [`Config::load`] but for an explicit file.
    pub async fn load_from(config_path: &Path) -> Self {
        match Self::try_load(config_path).await {
            Ok(config) => {
                info!(
                    dir = %config.syncthing_config_dir,
                    sync_enabled = config.sync_enabled,
                    "Loaded configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        }
    }

    async fn try_load(config_path: &Path) -> Result<Self, UiError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| UiError::Config(format!("Failed to read config file: {err}")))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|err| UiError::Config(format!("Failed to parse config.json: {err}")))?;

        if config.startup_attempts == 0 {
            return Err(UiError::Config(
                "startup_attempts must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
