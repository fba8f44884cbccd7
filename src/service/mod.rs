mod monitor;
mod state;

pub use monitor::{MonitorSettings, ServiceMonitor};
pub use state::{ListenerId, ServiceState, StateBroadcaster, StateListener};
