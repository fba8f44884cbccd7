use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::Config;
use crate::syncthing_client::SyncthingClient;

use super::state::{ServiceState, StateBroadcaster};

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub startup_attempts: u32,
    pub sync_enabled: bool,
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: Duration::from_millis(config.monitor_interval_ms.max(100)),
            startup_attempts: config.startup_attempts.max(1),
            sync_enabled: config.sync_enabled,
        }
    }
}

/// Probes the daemon and publishes its lifecycle through a [`StateBroadcaster`].
pub struct ServiceMonitor {
    client: SyncthingClient,
    broadcaster: Arc<StateBroadcaster>,
    settings: MonitorSettings,
    consecutive_failures: u32,
    was_active: bool,
}

impl ServiceMonitor {
    pub fn new(
        client: SyncthingClient,
        broadcaster: Arc<StateBroadcaster>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            client,
            broadcaster,
            settings,
            consecutive_failures: 0,
            was_active: false,
        }
    }

    /// Runs one probe and returns the state published afterwards.
    pub async fn poll_once(&mut self) -> ServiceState {
        if !self.settings.sync_enabled {
            self.broadcaster.set_state(ServiceState::Disabled);
            return ServiceState::Disabled;
        }

        if matches!(
            self.broadcaster.state(),
            ServiceState::Init | ServiceState::Disabled
        ) {
            self.broadcaster.set_state(ServiceState::Starting);
        }

        let probe = match self.client.ping().await {
            Ok(()) => self.client.load_config().await,
            Err(err) => Err(err),
        };

        match probe {
            Ok(()) => {
                self.consecutive_failures = 0;
                self.was_active = true;
                self.broadcaster.set_state(ServiceState::Active);
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                debug!(
                    failures = self.consecutive_failures,
                    error = ?err,
                    "Syncthing probe failed"
                );
                if self.was_active {
                    self.broadcaster.set_state(ServiceState::Starting);
                } else if self.consecutive_failures >= self.settings.startup_attempts {
                    warn!(
                        attempts = self.consecutive_failures,
                        error = ?err,
                        "Syncthing did not come up"
                    );
                    self.broadcaster.set_state(ServiceState::Error);
                }
            }
        }

        self.broadcaster.state()
    }

    /// Probes every `interval` until shutdown is signalled or the daemon is
    /// declared errored.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if self.poll_once().await == ServiceState::Error {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Service monitor stopped");
    }
}
