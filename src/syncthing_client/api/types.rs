use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Subset of `GET /rest/config` the shell works with.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncthingConfig {
    #[serde(default)]
    pub folders: Vec<FolderConfig>,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub gui: Gui,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct FolderConfig {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub paused: Option<bool>,
    #[serde(default)]
    pub devices: Vec<FolderDevice>,
}

impl FolderConfig {
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.id,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FolderDevice {
    #[serde(rename = "deviceID")]
    pub device_id: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DeviceConfig {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub paused: Option<bool>,
}

impl DeviceConfig {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.device_id,
        }
    }
}

/// Daemon-wide options. Unknown keys are carried through so a PUT does not
/// drop settings this crate does not model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Options {
    #[serde(rename = "urAccepted", default)]
    pub ur_accepted: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Options {
    pub const USAGE_REPORTING_UNDECIDED: i32 = 0;
    pub const USAGE_REPORTING_DENIED: i32 = -1;
    pub const USAGE_REPORTING_ACCEPTED: i32 = 3;

    pub fn usage_report_value(&self) -> i32 {
        self.ur_accepted
    }
}

/// GUI section of the daemon configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Gui {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "useTLS", default)]
    pub use_tls: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Gui {
    /// Browser URL of the web GUI, if an address is configured.
    pub fn url(&self) -> Option<String> {
        let address = self.address.as_deref()?.trim();
        if address.is_empty() {
            return None;
        }
        let scheme = if self.use_tls { "https" } else { "http" };
        Some(format!("{scheme}://{address}"))
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: HashMap<String, ConnectionState>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ConnectionState {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default, rename = "clientVersion")]
    pub client_version: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "lastSeen")]
    pub last_seen: Option<String>,
}
