use serde::{Deserialize, Serialize};

/// Configuration for the Syncthing shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_dir")]
    pub syncthing_config_dir: String,

    /// Overrides the REST endpoint probed first during discovery.
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,

    /// Consecutive failed probes tolerated before the daemon is reported as errored.
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: u32,

    #[serde(default = "default_sync_enabled")]
    pub sync_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            syncthing_config_dir: default_config_dir(),
            api_url: None,
            monitor_interval_ms: default_monitor_interval_ms(),
            startup_attempts: default_startup_attempts(),
            sync_enabled: default_sync_enabled(),
        }
    }
}

fn default_config_dir() -> String {
    "/home/root/.config/syncthing".to_string()
}

fn default_monitor_interval_ms() -> u64 {
    2_000
}

fn default_startup_attempts() -> u32 {
    30
}

fn default_sync_enabled() -> bool {
    true
}
