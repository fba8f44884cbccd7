use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::syncthing_client::api::ConnectionState;
use crate::syncthing_client::helpers::format_relative_time;

/// Live connection annotation shown next to a device row.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct DeviceConnection {
    pub connected: bool,
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

impl DeviceConnection {
    /// Merges the configured pause flag with the daemon's connection report.
    pub fn from_state(
        configured_paused: bool,
        state: Option<&ConnectionState>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            connected: state.map(|s| s.connected).unwrap_or(false),
            paused: configured_paused || state.map(|s| s.paused).unwrap_or(false),
            address: state
                .and_then(|s| s.address.clone())
                .filter(|addr| !addr.is_empty()),
            client_version: state
                .and_then(|s| s.client_version.clone())
                .filter(|version| !version.is_empty()),
            last_seen: state
                .and_then(|s| s.last_seen.as_deref())
                .map(|seen| format_relative_time(seen, now)),
        }
    }

    pub fn summary(&self) -> String {
        if self.paused {
            return "Paused".to_string();
        }
        if !self.connected {
            return match &self.last_seen {
                Some(seen) => format!("Disconnected (seen {seen})"),
                None => "Disconnected".to_string(),
            };
        }
        match &self.address {
            Some(address) => format!("Connected via {address}"),
            None => "Connected".to_string(),
        }
    }
}
