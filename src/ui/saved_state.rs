use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::UiError;

/// Per-list state kept across a recreation of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListScreenState {
    #[serde(default)]
    pub last_visible_to_user: bool,
    #[serde(default)]
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawerScreenState {
    #[serde(default)]
    pub open: bool,
}

/// Everything the shell needs to come back where it left off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub current_tab: usize,
    #[serde(default)]
    pub folders: ListScreenState,
    #[serde(default)]
    pub devices: ListScreenState,
    #[serde(default)]
    pub drawer: DrawerScreenState,
}

impl SavedState {
    pub fn to_bundle(&self) -> Result<String, UiError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_bundle(bundle: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(bundle)?)
    }

    /// Reads a bundle written by [`SavedState::save`]. A missing or unreadable
    /// file means a fresh start.
    pub async fn load(path: &Path) -> Option<Self> {
        let bundle = match tokio::fs::read_to_string(path).await {
            Ok(bundle) => bundle,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read saved UI state");
                return None;
            }
        };
        match Self::from_bundle(&bundle) {
            Ok(state) => {
                debug!(path = %path.display(), "Restored UI state");
                Some(state)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Ignoring malformed saved UI state");
                None
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), UiError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_bundle()?).await?;
        Ok(())
    }
}
