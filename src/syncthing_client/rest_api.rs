use async_trait::async_trait;

use crate::types::UiError;

use super::api::{ConnectionsResponse, DeviceConfig, FolderConfig, Gui, Options};
use super::models::{FolderStatus, SyncthingOverview};

/// Operations the UI layer needs from the daemon's REST API.
///
/// Configuration reads are served from the snapshot taken by the last
/// successful config load and return `None` until one exists.
#[async_trait]
pub trait RestApi: Send + Sync {
    fn is_config_loaded(&self) -> bool;

    /// Folders sorted by label.
    fn folders(&self) -> Option<Vec<FolderConfig>>;

    /// Devices sorted by name; the local device is left out unless
    /// `include_local` is set.
    fn devices(&self, include_local: bool) -> Option<Vec<DeviceConfig>>;

    fn options(&self) -> Option<Options>;

    fn gui(&self) -> Option<Gui>;

    async fn folder_status(&self, folder: &FolderConfig) -> Result<FolderStatus, UiError>;

    async fn connections(&self) -> Result<ConnectionsResponse, UiError>;

    async fn system_status(&self) -> Result<SyncthingOverview, UiError>;

    /// Writes the GUI and options sections back to the daemon.
    async fn edit_settings(&self, gui: &Gui, options: &Options) -> Result<(), UiError>;

    /// Preview of the anonymous usage report, pretty-printed.
    async fn usage_report(&self) -> Result<String, UiError>;
}
