use serde::Serialize;
use serde_json::Value;

/// Daemon summary rendered in the navigation drawer.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct SyncthingOverview {
    pub my_id: Option<String>,
    pub version: Option<String>,
    pub state: Option<String>,
    pub started_at: Option<String>,
    pub uptime_seconds: Option<f64>,
    pub goroutine_count: Option<u64>,
}

impl SyncthingOverview {
    /// Builds the overview from `GET /rest/system/status`, merged with the
    /// `version` field of `GET /rest/system/version` when available.
    pub fn from_value(status: &Value, version: Option<&Value>) -> Self {
        Self {
            my_id: status
                .get("myID")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            version: version
                .and_then(|v| v.get("version"))
                .or_else(|| status.get("version"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            state: status
                .get("state")
                .or_else(|| status.get("status"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            started_at: status
                .get("startTime")
                .or_else(|| status.get("startedAt"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            uptime_seconds: status.get("uptime").and_then(|v| v.as_f64()),
            goroutine_count: status.get("goroutineCount").and_then(|v| v.as_u64()),
        }
    }

    /// First block of the device ID, the way Syncthing abbreviates it.
    pub fn short_id(&self) -> Option<&str> {
        let id = self.my_id.as_deref()?;
        Some(id.split('-').next().unwrap_or(id))
    }

    pub fn uptime_label(&self) -> Option<String> {
        let total = self.uptime_seconds? as u64;
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        Some(if days > 0 {
            format!("{days}d {hours}h")
        } else if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        })
    }
}
