use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::UiError;

use super::Config;

const SAVED_STATE_FILE: &str = "ui_state.json";

impl Config {
    /// Get the full path to the Syncthing config XML file
    pub fn syncthing_config_xml_path(&self) -> PathBuf {
        Path::new(self.syncthing_config_dir.trim_end_matches('/')).join("config.xml")
    }

    /// Whether the daemon has never written its configuration, i.e. keys are
    /// about to be generated.
    pub fn is_first_start(&self) -> bool {
        !self.syncthing_config_xml_path().exists()
    }

    /// Get the root directory of the application
    pub fn app_root_dir() -> Result<PathBuf, UiError> {
        let config_path = get_config_path()?;
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            Some(_) => std::env::current_dir().map_err(|err| {
                UiError::Config(format!("Failed to determine app root: {err}"))
            }),
            None => Err(UiError::Config(
                "Unable to determine app root directory".to_string(),
            )),
        }
    }

    /// File the front-end uses to persist tab and screen state between runs.
    pub fn saved_state_path() -> Result<PathBuf, UiError> {
        Ok(Self::app_root_dir()?.join(SAVED_STATE_FILE))
    }

    /// Path whose creation time stands in for the app's first install time.
    pub fn install_marker_path() -> Result<PathBuf, UiError> {
        Self::app_root_dir()
    }
}

/// Get the path to the config.json file
/// Looks for config.json in the app directory (parent of the binary folder)
pub(super) fn get_config_path() -> Result<PathBuf, UiError> {
    // Executable is at: app_root/bin/syncthing-shell
    // Config should be at: app_root/config.json
    if let Ok(exe_path) = std::env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(bin_dir) = exe_path.parent() {
            if let Some(app_root) = bin_dir.parent() {
                let config_path = app_root.join("config.json");
                debug!(path = %config_path.display(), "Looking for config");
                return Ok(config_path);
            }
        }
    }

    warn!("Using fallback: looking for config.json in current directory");
    Ok(PathBuf::from("config.json"))
}
