//! Service monitor state transitions against a mock daemon.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use wiremock::MockServer;

use syncthing_shell::service::{
    ListenerId, MonitorSettings, ServiceMonitor, ServiceState, StateBroadcaster, StateListener,
};
use syncthing_shell::syncthing_client::{RestApi, SyncthingClient};

use crate::common;

#[derive(Default)]
struct Recorder {
    states: Mutex<Vec<ServiceState>>,
}

impl StateListener for Recorder {
    fn on_service_state_change(&self, state: ServiceState) {
        self.states.lock().unwrap().push(state);
    }
}

impl Recorder {
    fn states(&self) -> Vec<ServiceState> {
        self.states.lock().unwrap().clone()
    }
}

fn settings(startup_attempts: u32) -> MonitorSettings {
    MonitorSettings {
        interval: Duration::from_millis(10),
        startup_attempts,
        sync_enabled: true,
    }
}

fn watched() -> (Arc<StateBroadcaster>, Arc<Recorder>) {
    let broadcaster = Arc::new(StateBroadcaster::new());
    let recorder = Arc::new(Recorder::default());
    broadcaster.register(ListenerId::Main, recorder.clone());
    (broadcaster, recorder)
}

#[tokio::test]
async fn test_reachable_daemon_becomes_active_with_config() {
    let (_server, client) = common::setup_syncthing_mock().await;
    let (broadcaster, recorder) = watched();
    let mut monitor = ServiceMonitor::new(client.clone(), broadcaster, settings(3));

    assert_eq!(monitor.poll_once().await, ServiceState::Active);
    assert_eq!(
        recorder.states(),
        vec![ServiceState::Init, ServiceState::Starting, ServiceState::Active]
    );
    assert!(client.is_config_loaded());

    // Steady state broadcasts nothing new.
    assert_eq!(monitor.poll_once().await, ServiceState::Active);
    assert_eq!(recorder.states().len(), 3);
}

#[tokio::test]
async fn test_unreachable_daemon_errors_after_startup_attempts() {
    let server = MockServer::start().await;
    let client = SyncthingClient::with_base_url(common::API_KEY, server.uri()).unwrap();
    let (broadcaster, recorder) = watched();
    let mut monitor = ServiceMonitor::new(client, broadcaster, settings(3));

    assert_eq!(monitor.poll_once().await, ServiceState::Starting);
    assert_eq!(monitor.poll_once().await, ServiceState::Starting);
    assert_eq!(monitor.poll_once().await, ServiceState::Error);
    assert_eq!(
        recorder.states(),
        vec![ServiceState::Init, ServiceState::Starting, ServiceState::Error]
    );
}

#[tokio::test]
async fn test_lost_daemon_goes_back_to_starting() {
    let (server, client) = common::setup_syncthing_mock().await;
    let (broadcaster, recorder) = watched();
    let mut monitor = ServiceMonitor::new(client, broadcaster, settings(1));

    assert_eq!(monitor.poll_once().await, ServiceState::Active);
    server.reset().await;
    assert_eq!(monitor.poll_once().await, ServiceState::Starting);
    assert_eq!(monitor.poll_once().await, ServiceState::Starting);
    assert_eq!(recorder.states().last(), Some(&ServiceState::Starting));
}

#[tokio::test]
async fn test_disabled_sync_publishes_disabled() {
    let (_server, client) = common::setup_syncthing_mock().await;
    let (broadcaster, recorder) = watched();
    let mut monitor = ServiceMonitor::new(
        client,
        broadcaster,
        MonitorSettings {
            sync_enabled: false,
            ..settings(3)
        },
    );

    assert_eq!(monitor.poll_once().await, ServiceState::Disabled);
    assert_eq!(
        recorder.states(),
        vec![ServiceState::Init, ServiceState::Disabled]
    );
}

#[tokio::test]
async fn test_run_stops_on_error_and_on_shutdown() {
    let server = MockServer::start().await;
    let client = SyncthingClient::with_base_url(common::API_KEY, server.uri()).unwrap();
    let (broadcaster, _recorder) = watched();
    let (_tx, rx) = watch::channel(false);
    let monitor = ServiceMonitor::new(client, Arc::clone(&broadcaster), settings(2));
    tokio::time::timeout(Duration::from_secs(5), monitor.run(rx))
        .await
        .expect("monitor gives up after two attempts");
    assert_eq!(broadcaster.state(), ServiceState::Error);

    let (_server, client) = common::setup_syncthing_mock().await;
    let (broadcaster, _recorder) = watched();
    let (tx, rx) = watch::channel(false);
    let monitor = ServiceMonitor::new(client, Arc::clone(&broadcaster), settings(2));
    let handle = tokio::spawn(monitor.run(rx));
    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor stops on shutdown")
        .unwrap();
    assert_eq!(broadcaster.state(), ServiceState::Active);
}
