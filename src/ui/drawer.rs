use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::service::ServiceState;
use crate::syncthing_client::{RestApi, SyncthingOverview};

use super::event_loop::{ScreenId, UiHandle};
use super::host::Host;
use super::navigation::NavigationIntent;
use super::poller::Poller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawerAction {
    Settings,
    WebGui,
    Exit,
}

/// Content of the navigation drawer: daemon overview plus app actions.
#[derive(Debug)]
pub struct DrawerScreen {
    poller: Poller,
    open: bool,
    overview: Option<SyncthingOverview>,
    service_state: ServiceState,
}

impl Default for DrawerScreen {
    fn default() -> Self {
        Self {
            poller: Poller::new(ScreenId::Drawer),
            open: false,
            overview: None,
            service_state: ServiceState::Init,
        }
    }
}

impl DrawerScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the overview once and hands it to the host.
    pub async fn request_gui_update(&mut self, host: &mut dyn Host, api: Option<&dyn RestApi>) {
        if host.is_finishing() {
            return;
        }
        let Some(api) = api else {
            return;
        };
        match api.system_status().await {
            Ok(overview) => {
                host.render_overview(&overview);
                self.overview = Some(overview);
            }
            Err(err) => warn!(error = ?err, "Failed to fetch system status"),
        }
    }

    pub fn on_service_state_change(&mut self, state: ServiceState) {
        self.service_state = state;
    }

    pub fn on_drawer_opened(&mut self, ui: &UiHandle) {
        self.open = true;
        self.poller.start(ui);
    }

    pub fn on_drawer_closed(&mut self) {
        self.open = false;
        self.poller.stop();
    }

    pub async fn on_tick(
        &mut self,
        generation: u64,
        ui: &UiHandle,
        host: &mut dyn Host,
        api: Option<&dyn RestApi>,
    ) {
        if !self.poller.accept_tick(generation, ui) {
            return;
        }
        // Only an active daemon has an overview to show.
        if self.service_state != ServiceState::Active {
            return;
        }
        self.request_gui_update(host, api).await;
    }

    pub fn on_action(&self, action: DrawerAction, host: &mut dyn Host, api: Option<&dyn RestApi>) {
        debug!(?action, "Drawer action");
        match action {
            DrawerAction::Settings => host.start_screen(NavigationIntent::settings()),
            DrawerAction::WebGui => match api.and_then(|api| api.gui()).and_then(|gui| gui.url()) {
                Some(url) => host.open_url(&url),
                None => warn!("Web GUI address unknown"),
            },
            DrawerAction::Exit => host.finish(),
        }
    }

    pub fn stop(&mut self) {
        self.poller.stop();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_armed()
    }

    pub fn service_state(&self) -> ServiceState {
        self.service_state
    }

    pub fn overview(&self) -> Option<&SyncthingOverview> {
        self.overview.as_ref()
    }
}
