//! Shared fakes and wiremock helpers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use syncthing_shell::service::StateBroadcaster;
use syncthing_shell::syncthing_client::{
    ConnectionsResponse, DeviceConfig, FolderConfig, FolderStatus, Gui, Options, RestApi,
    SyncthingClient, SyncthingOverview,
};
use syncthing_shell::types::UiError;
use syncthing_shell::ui::{
    ui_channel, DialogKind, Host, LaunchOptions, ListKind, ListRow, MainShell, Modal,
    NavigationIntent, SavedState, UiLoop,
};

pub const API_KEY: &str = "test-api-key";
pub const LOCAL_ID: &str = "LOCAL11-AAAAAAA-BBBBBBB-CCCCCCC-DDDDDDD-EEEEEEE-FFFFFFF-GGGGGGG";
pub const REMOTE_ID: &str = "REMOTE2-AAAAAAA-BBBBBBB-CCCCCCC-DDDDDDD-EEEEEEE-FFFFFFF-GGGGGGG";

/// Mock daemon answering ping, status and config.
pub async fn setup_syncthing_mock() -> (MockServer, SyncthingClient) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/system/ping"))
        .and(header("X-API-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ping": "pong" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "myID": LOCAL_ID,
            "uptime": 7260,
            "goroutineCount": 42,
            "startTime": "2024-03-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folders": [
                { "id": "zeta", "label": "Zeta", "path": "/data/zeta", "paused": false, "devices": [] },
                { "id": "alpha", "label": "", "path": "/data/alpha", "devices": [{ "deviceID": REMOTE_ID }] }
            ],
            "devices": [
                { "deviceID": LOCAL_ID, "name": "tablet" },
                { "deviceID": REMOTE_ID, "name": "laptop", "addresses": ["dynamic"] }
            ],
            "options": { "urAccepted": 0, "globalAnnounceEnabled": true },
            "gui": { "address": "127.0.0.1:8384", "useTLS": false, "theme": "dark" }
        })))
        .mount(&server)
        .await;

    let client = SyncthingClient::with_base_url(API_KEY, server.uri()).expect("client builds");
    (server, client)
}

pub fn folder(id: &str) -> FolderConfig {
    FolderConfig {
        id: id.to_string(),
        label: Some(id.to_uppercase()),
        path: Some(format!("/data/{id}")),
        ..FolderConfig::default()
    }
}

pub fn device(id: &str, name: &str) -> DeviceConfig {
    DeviceConfig {
        device_id: id.to_string(),
        name: Some(name.to_string()),
        ..DeviceConfig::default()
    }
}

/// In-memory API. Every trait call is counted.
#[derive(Default)]
pub struct FakeApi {
    pub config_loaded: AtomicBool,
    pub folders: Mutex<Option<Vec<FolderConfig>>>,
    pub devices: Mutex<Option<Vec<DeviceConfig>>>,
    pub options: Mutex<Options>,
    pub edits: Mutex<Vec<Options>>,
    /// Makes `folder_status` and `connections` fail.
    pub status_unavailable: AtomicBool,
    pub calls: AtomicUsize,
    pub usage_report_calls: AtomicUsize,
    pub system_status_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_folders(folders: Vec<FolderConfig>) -> Arc<Self> {
        let api = Self::default();
        api.config_loaded.store(true, Ordering::SeqCst);
        *api.folders.lock().unwrap() = Some(folders);
        *api.devices.lock().unwrap() = Some(Vec::new());
        Arc::new(api)
    }

    pub fn set_folders(&self, folders: Vec<FolderConfig>) {
        *self.folders.lock().unwrap() = Some(folders);
    }

    pub fn set_devices(&self, devices: Vec<DeviceConfig>) {
        *self.devices.lock().unwrap() = Some(devices);
    }

    pub fn set_status_unavailable(&self, unavailable: bool) {
        self.status_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn clear_folders(&self) {
        *self.folders.lock().unwrap() = None;
    }

    fn check_status(&self) -> Result<(), UiError> {
        if self.status_unavailable.load(Ordering::SeqCst) {
            return Err(UiError::Syncthing("503 Service Unavailable".to_string()));
        }
        Ok(())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RestApi for FakeApi {
    fn is_config_loaded(&self) -> bool {
        self.hit();
        self.config_loaded.load(Ordering::SeqCst)
    }

    fn folders(&self) -> Option<Vec<FolderConfig>> {
        self.hit();
        self.folders.lock().unwrap().clone()
    }

    fn devices(&self, _include_local: bool) -> Option<Vec<DeviceConfig>> {
        self.hit();
        self.devices.lock().unwrap().clone()
    }

    fn options(&self) -> Option<Options> {
        self.hit();
        Some(self.options.lock().unwrap().clone())
    }

    fn gui(&self) -> Option<Gui> {
        self.hit();
        Some(Gui {
            address: Some("127.0.0.1:8384".to_string()),
            ..Gui::default()
        })
    }

    async fn folder_status(&self, folder: &FolderConfig) -> Result<FolderStatus, UiError> {
        self.hit();
        self.check_status()?;
        Ok(FolderStatus::from_value(
            folder.paused.unwrap_or(false),
            &json!({ "state": "idle", "globalBytes": 100, "needBytes": 0 }),
        ))
    }

    async fn connections(&self) -> Result<ConnectionsResponse, UiError> {
        self.hit();
        self.check_status()?;
        Ok(ConnectionsResponse::default())
    }

    async fn system_status(&self) -> Result<SyncthingOverview, UiError> {
        self.hit();
        self.system_status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SyncthingOverview {
            my_id: Some(LOCAL_ID.to_string()),
            version: Some("v1.27.0".to_string()),
            ..SyncthingOverview::default()
        })
    }

    async fn edit_settings(&self, _gui: &Gui, options: &Options) -> Result<(), UiError> {
        self.hit();
        self.edits.lock().unwrap().push(options.clone());
        *self.options.lock().unwrap() = options.clone();
        Ok(())
    }

    async fn usage_report(&self) -> Result<String, UiError> {
        self.hit();
        self.usage_report_calls.fetch_add(1, Ordering::SeqCst);
        Ok("{\n  \"platform\": \"linux-arm\"\n}".to_string())
    }
}

/// What the shell asked the platform to do.
#[derive(Debug, Default)]
pub struct Record {
    pub finishing: bool,
    pub finished: usize,
    pub shown: Vec<Modal>,
    pub dismissed: Vec<DialogKind>,
    pub screens: Vec<NavigationIntent>,
    pub urls: Vec<String>,
    pub lists: Vec<(ListKind, Vec<ListRow>)>,
    pub overviews: usize,
    pub drawer_open: bool,
    pub drawer_locked: bool,
    pub drawer_width: Option<u32>,
    pub current_tab: Option<usize>,
}

impl Record {
    pub fn shown_kinds(&self) -> Vec<DialogKind> {
        self.shown.iter().map(Modal::kind).collect()
    }

    pub fn last_list(&self, kind: ListKind) -> Option<&Vec<ListRow>> {
        self.lists
            .iter()
            .rev()
            .find(|(list, _)| *list == kind)
            .map(|(_, rows)| rows)
    }
}

pub struct RecordingHost {
    record: Arc<Mutex<Record>>,
}

impl RecordingHost {
    pub fn new() -> (Self, Arc<Mutex<Record>>) {
        let record = Arc::new(Mutex::new(Record::default()));
        (
            Self {
                record: Arc::clone(&record),
            },
            record,
        )
    }
}

impl Host for RecordingHost {
    fn is_finishing(&self) -> bool {
        self.record.lock().unwrap().finishing
    }

    fn finish(&mut self) {
        let mut record = self.record.lock().unwrap();
        record.finishing = true;
        record.finished += 1;
    }

    fn start_screen(&mut self, intent: NavigationIntent) {
        self.record.lock().unwrap().screens.push(intent);
    }

    fn open_url(&mut self, url: &str) {
        self.record.lock().unwrap().urls.push(url.to_string());
    }

    fn show_dialog(&mut self, modal: &Modal) {
        self.record.lock().unwrap().shown.push(modal.clone());
    }

    fn dismiss_dialog(&mut self, kind: DialogKind) {
        self.record.lock().unwrap().dismissed.push(kind);
    }

    fn render_list(&mut self, list: ListKind, rows: &[ListRow]) {
        self.record.lock().unwrap().lists.push((list, rows.to_vec()));
    }

    fn render_overview(&mut self, _overview: &SyncthingOverview) {
        self.record.lock().unwrap().overviews += 1;
    }

    fn set_drawer_open(&mut self, open: bool) {
        self.record.lock().unwrap().drawer_open = open;
    }

    fn set_drawer_locked(&mut self, locked: bool) {
        self.record.lock().unwrap().drawer_locked = locked;
    }

    fn set_drawer_width(&mut self, width_px: u32) {
        self.record.lock().unwrap().drawer_width = Some(width_px);
    }

    fn set_current_tab(&mut self, index: usize) {
        self.record.lock().unwrap().current_tab = Some(index);
    }
}

pub fn launch_installed_days_ago(days: i64) -> LaunchOptions {
    LaunchOptions {
        first_start: false,
        first_install: Utc::now() - Duration::days(days),
    }
}

pub struct Harness {
    pub shell: MainShell,
    pub ui_loop: UiLoop,
    pub ui: syncthing_shell::ui::UiHandle,
    pub record: Arc<Mutex<Record>>,
    pub broadcaster: Arc<StateBroadcaster>,
    pub api: Arc<FakeApi>,
}

impl Harness {
    /// Shell connected to `api`, resumed, with the daemon still in `Init`.
    pub async fn start(api: Arc<FakeApi>, launch: LaunchOptions, saved: Option<SavedState>) -> Self {
        let (ui, ui_loop) = ui_channel();
        let (host, record) = RecordingHost::new();
        let mut shell = MainShell::new(Box::new(host), ui.clone(), launch, saved);
        let broadcaster = Arc::new(StateBroadcaster::new());
        let rest: Arc<dyn RestApi> = api.clone();
        shell.on_service_connected(Arc::clone(&broadcaster), Some(rest));
        shell.on_resume();

        let mut harness = Self {
            shell,
            ui_loop,
            ui,
            record,
            broadcaster,
            api,
        };
        harness.pump().await;
        harness
    }

    /// Handles everything already queued, letting spawned tasks run in between.
    pub async fn pump(&mut self) {
        loop {
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            match self.ui_loop.try_next_event() {
                Some(event) => {
                    let _ = self.shell.handle_event(event).await;
                }
                None => break,
            }
        }
    }

    /// Waits for the next event, handles it and returns it.
    pub async fn step(&mut self) -> syncthing_shell::ui::UiEvent {
        let event = self.ui_loop.next_event().await.expect("ui loop open");
        let _ = self.shell.handle_event(event.clone()).await;
        event
    }

    pub async fn set_state(&mut self, state: syncthing_shell::service::ServiceState) {
        self.broadcaster.set_state(state);
        self.pump().await;
    }
}
