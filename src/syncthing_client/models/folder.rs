use serde::Serialize;
use serde_json::Value;

/// Represents the current state of a folder in a human-readable format.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FolderStateCode {
    #[default]
    Unknown,
    Paused,
    Error,
    WaitingToScan,
    WaitingToSync,
    Scanning,
    PreparingToSync,
    Syncing,
    PendingChanges,
    UpToDate,
}

/// Live status annotation shown next to a folder row.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FolderStatus {
    pub state: String,
    pub state_code: FolderStateCode,
    pub state_raw: Option<String>,
    pub global_bytes: Option<u64>,
    pub in_sync_bytes: Option<u64>,
    pub need_bytes: Option<u64>,
    pub completion: f64,
}

impl FolderStatus {
    /// Builds the annotation from a `GET /rest/db/status` body.
    pub fn from_value(paused: bool, status: &Value) -> Self {
        let global_bytes = status.get("globalBytes").and_then(|v| v.as_u64());
        let need_bytes = status.get("needBytes").and_then(|v| v.as_u64());
        let in_sync_bytes = status.get("inSyncBytes").and_then(|v| v.as_u64());
        let state_raw = status
            .get("state")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let (state, state_code) = humanize_folder_state(paused, state_raw.as_deref(), need_bytes);

        Self {
            state: state.to_string(),
            state_code,
            state_raw,
            global_bytes,
            in_sync_bytes,
            need_bytes,
            completion: compute_completion(global_bytes, need_bytes),
        }
    }

    /// One-line summary, e.g. `Syncing (42%)`.
    pub fn summary(&self) -> String {
        match self.state_code {
            FolderStateCode::Syncing | FolderStateCode::PendingChanges => {
                format!("{} ({:.0}%)", self.state, self.completion)
            }
            _ => self.state.clone(),
        }
    }
}

/// Calculates folder completion percentage based on global and needed bytes.
fn compute_completion(global_bytes: Option<u64>, need_bytes: Option<u64>) -> f64 {
    match (global_bytes, need_bytes) {
        (Some(global), Some(need)) if global > 0 => {
            let complete = global.saturating_sub(need);
            ((complete as f64 / global as f64) * 100.0).clamp(0.0, 100.0)
        }
        (Some(global), None) if global > 0 => 100.0,
        _ => 0.0,
    }
}

fn humanize_folder_state(
    paused: bool,
    state: Option<&str>,
    need_bytes: Option<u64>,
) -> (&'static str, FolderStateCode) {
    if paused {
        return ("Paused", FolderStateCode::Paused);
    }

    if let Some(state_value) = state {
        let normalized = state_value.to_ascii_lowercase();
        if normalized.contains("waiting") && normalized.contains("scan") {
            return ("Waiting to scan", FolderStateCode::WaitingToScan);
        }
        if normalized.contains("waiting") && normalized.contains("sync") {
            return ("Waiting to sync", FolderStateCode::WaitingToSync);
        }
        if normalized.contains("preparing") && normalized.contains("sync") {
            return ("Preparing to sync", FolderStateCode::PreparingToSync);
        }

        match normalized.as_str() {
            "scanning" => return ("Scanning", FolderStateCode::Scanning),
            "syncing" => return ("Syncing", FolderStateCode::Syncing),
            "error" => return ("Error", FolderStateCode::Error),
            "idle" if need_bytes.unwrap_or(0) > 0 => {
                return ("Idle / pending changes", FolderStateCode::PendingChanges)
            }
            "idle" => return ("Up to date", FolderStateCode::UpToDate),
            _ => {}
        }
    }

    if need_bytes.unwrap_or(0) == 0 {
        ("Up to date", FolderStateCode::UpToDate)
    } else {
        ("Unknown state", FolderStateCode::Unknown)
    }
}
