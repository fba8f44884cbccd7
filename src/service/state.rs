use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lifecycle of the daemon as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    #[default]
    Init,
    Starting,
    Active,
    Error,
    Disabled,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceState::Init => "init",
            ServiceState::Starting => "starting",
            ServiceState::Active => "active",
            ServiceState::Error => "error",
            ServiceState::Disabled => "disabled",
        };
        f.write_str(label)
    }
}

/// Identity a listener is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerId {
    Main,
    Folders,
    Devices,
}

pub trait StateListener: Send + Sync {
    fn on_service_state_change(&self, state: ServiceState);
}

/// Fans the daemon state out to registered listeners.
///
/// Deliveries are serialized, so a listener never sees an older state after
/// a newer one. Listeners must not call back into the broadcaster.
#[derive(Default)]
pub struct StateBroadcaster {
    inner: Mutex<BroadcasterInner>,
    delivery: Mutex<()>,
}

#[derive(Default)]
struct BroadcasterInner {
    state: ServiceState,
    listeners: Vec<(ListenerId, Arc<dyn StateListener>)>,
}

impl StateBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ServiceState {
        self.lock().state
    }

    /// Registers `listener` under `id`, replacing any listener already using
    /// that id, and delivers the current state to it right away.
    pub fn register(&self, id: ListenerId, listener: Arc<dyn StateListener>) {
        let _delivery = self.deliver();
        let state = {
            let mut inner = self.lock();
            inner.listeners.retain(|(existing, _)| *existing != id);
            inner.listeners.push((id, Arc::clone(&listener)));
            inner.state
        };
        debug!(listener = ?id, %state, "Registered state listener");
        listener.on_service_state_change(state);
    }

    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        let removed = inner.listeners.len() != before;
        if removed {
            debug!(listener = ?id, "Unregistered state listener");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Records `state` and notifies every listener if it differs from the
    /// current one. Returns whether a broadcast happened.
    pub fn set_state(&self, state: ServiceState) -> bool {
        let _delivery = self.deliver();
        let listeners = {
            let mut inner = self.lock();
            if inner.state == state {
                return false;
            }
            info!(from = %inner.state, to = %state, "Service state changed");
            inner.state = state;
            inner.listeners.clone()
        };
        for (_, listener) in listeners {
            listener.on_service_state_change(state);
        }
        true
    }

    fn deliver(&self) -> std::sync::MutexGuard<'_, ()> {
        self.delivery
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BroadcasterInner> {
        // Listeners run outside the lock, so a poisoned guard still holds consistent data.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
