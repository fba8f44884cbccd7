use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::service::{ListenerId, ServiceState, StateBroadcaster};
use crate::syncthing_client::RestApi;

use super::dialogs::{LifecycleAction, LifecycleDialogController, Modal};
use super::devices::DeviceListScreen;
use super::drawer::DrawerScreen;
use super::event_loop::{ScreenId, UiEvent, UiHandle, UiStateListener, UserInput};
use super::folders::FolderListScreen;
use super::host::Host;
use super::list::ListKind;
use super::saved_state::{DrawerScreenState, SavedState};

/// Folders, then devices.
pub const TAB_COUNT: usize = 2;

pub const FOLDERS_TAB: usize = 0;
pub const DEVICES_TAB: usize = 1;

/// How the hosting screen was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    /// The daemon is generating its keys on this start.
    pub first_start: bool,
    pub first_install: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    pub action_bar_px: u32,
}

/// Drawer width per the material navigation drawer guidelines: the smaller
/// screen side minus the action bar, capped at five action bar heights.
pub fn optimal_drawer_width(metrics: DisplayMetrics) -> u32 {
    let smallest = metrics.width_px.min(metrics.height_px);
    smallest
        .saturating_sub(metrics.action_bar_px)
        .min(metrics.action_bar_px.saturating_mul(5))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    DrawerClosed,
    Finished,
}

/// The main screen: two list tabs, the navigation drawer and the lifecycle
/// dialogs, all driven from the UI loop.
pub struct MainShell {
    host: Box<dyn Host>,
    ui: UiHandle,
    api: Option<Arc<dyn RestApi>>,
    connector: Option<Arc<StateBroadcaster>>,
    folders: FolderListScreen,
    devices: DeviceListScreen,
    drawer: DrawerScreen,
    current_tab: usize,
    drawer_locked: bool,
    reopen_drawer: bool,
    lifecycle: LifecycleDialogController,
    destroyed: bool,
}

impl MainShell {
    pub fn new(
        mut host: Box<dyn Host>,
        ui: UiHandle,
        launch: LaunchOptions,
        saved: Option<SavedState>,
    ) -> Self {
        let (mut folders, mut devices, current_tab) = match &saved {
            Some(state) => (
                FolderListScreen::restore(&state.folders),
                DeviceListScreen::restore(&state.devices),
                state.current_tab.min(TAB_COUNT - 1),
            ),
            None => (FolderListScreen::new(), DeviceListScreen::new(), FOLDERS_TAB),
        };
        // The drawer starts locked closed; a restored open drawer comes back
        // once the daemon is active.
        let reopen_drawer = saved.as_ref().is_some_and(|state| state.drawer.open);

        folders.on_view_created();
        devices.on_view_created();
        folders.set_user_visible_hint(current_tab == FOLDERS_TAB, &ui);
        devices.set_user_visible_hint(current_tab == DEVICES_TAB, &ui);

        host.set_drawer_locked(true);
        host.set_drawer_open(false);
        host.set_current_tab(current_tab);

        Self {
            host,
            ui,
            api: None,
            connector: None,
            folders,
            devices,
            drawer: DrawerScreen::new(),
            current_tab,
            drawer_locked: true,
            reopen_drawer,
            lifecycle: LifecycleDialogController::new(launch.first_start, launch.first_install),
            destroyed: false,
        }
    }

    pub fn layout(&mut self, metrics: DisplayMetrics) {
        self.host.set_drawer_width(optimal_drawer_width(metrics));
    }

    /// Binds the daemon connector. The shell and both tabs register as
    /// listeners, each receiving the current state right away.
    pub fn on_service_connected(
        &mut self,
        connector: Arc<StateBroadcaster>,
        api: Option<Arc<dyn RestApi>>,
    ) {
        self.api = api;
        for id in [ListenerId::Main, ListenerId::Folders, ListenerId::Devices] {
            connector.register(id, Arc::new(UiStateListener::new(id, self.ui.clone())));
        }
        self.connector = Some(connector);
    }

    /// Handles one event from the UI loop. Breaks once the shell is torn down.
    pub async fn handle_event(&mut self, event: UiEvent) -> ControlFlow<()> {
        if self.destroyed {
            return ControlFlow::Break(());
        }

        let destroy = matches!(event, UiEvent::Input(UserInput::Destroy));
        match event {
            UiEvent::ServiceStateChanged { listener, state } => match listener {
                ListenerId::Main => self.on_service_state_change(state).await,
                ListenerId::Folders => self.folders.on_service_state_change(state),
                ListenerId::Devices => self.devices.on_service_state_change(state),
            },
            UiEvent::Tick { screen, generation } => {
                let api = self.api.as_deref();
                let host = self.host.as_mut();
                match screen {
                    ScreenId::Folders => self.folders.on_tick(generation, &self.ui, host, api).await,
                    ScreenId::Devices => self.devices.on_tick(generation, &self.ui, host, api).await,
                    ScreenId::Drawer => self.drawer.on_tick(generation, &self.ui, host, api).await,
                }
            }
            UiEvent::UsageReportLoaded(report) => {
                self.lifecycle.on_usage_report_loaded(report, self.host.as_mut());
            }
            UiEvent::Input(input) => self.on_input(input).await,
        }

        if destroy || self.host.is_finishing() {
            self.destroy();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    async fn on_service_state_change(&mut self, state: ServiceState) {
        debug!(%state, "Main screen service state changed");
        self.drawer.on_service_state_change(state);
        let action = self.lifecycle.on_service_state_change(
            state,
            self.host.as_mut(),
            self.api.as_ref(),
            &self.ui,
            Utc::now(),
        );
        if action == LifecycleAction::Activated {
            self.set_drawer_locked(false);
            self.drawer
                .request_gui_update(self.host.as_mut(), self.api.as_deref())
                .await;
            if std::mem::take(&mut self.reopen_drawer) {
                self.open_drawer();
            }
        }
    }

    async fn on_input(&mut self, input: UserInput) {
        match input {
            UserInput::TabSelected(index) => self.select_tab(index),
            UserInput::Pause => self.on_pause(),
            UserInput::Resume => self.on_resume(),
            UserInput::BackPressed => {
                self.on_back_pressed();
            }
            UserInput::MenuKey => self.on_menu_key(),
            UserInput::Scrolled { list, offset } => match list {
                ListKind::Folders => self.folders.on_scrolled(offset),
                ListKind::Devices => self.devices.on_scrolled(offset),
            },
            UserInput::ItemClicked { list, position } => match list {
                ListKind::Folders => self.folders.on_item_click(position, self.host.as_mut()),
                ListKind::Devices => self.devices.on_item_click(position, self.host.as_mut()),
            },
            UserInput::AddItem => match self.current_tab {
                FOLDERS_TAB => self.folders.on_add(self.host.as_mut()),
                _ => self.devices.on_add(self.host.as_mut()),
            },
            UserInput::Refresh => {
                let api = self.api.as_deref();
                let host = self.host.as_mut();
                match self.current_tab {
                    FOLDERS_TAB => self.folders.refresh(host, api).await,
                    _ => self.devices.refresh(host, api).await,
                }
            }
            UserInput::DrawerOpened => self.drawer.on_drawer_opened(&self.ui),
            UserInput::DrawerClosed => self.drawer.on_drawer_closed(),
            UserInput::DrawerAction(action) => {
                self.close_drawer();
                self.drawer
                    .on_action(action, self.host.as_mut(), self.api.as_deref());
            }
            UserInput::UsageReportAnswer(choice) => {
                self.lifecycle
                    .answer_usage_report(choice, self.host.as_mut(), self.api.as_deref())
                    .await;
            }
            UserInput::DisabledDialogAnswer(choice) => {
                self.lifecycle.answer_disabled(choice, self.host.as_mut());
            }
            UserInput::Destroy => {}
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        if index >= TAB_COUNT {
            warn!(index, "Ignoring selection of unknown tab");
            return;
        }
        self.current_tab = index;
        self.folders
            .set_user_visible_hint(index == FOLDERS_TAB, &self.ui);
        self.devices
            .set_user_visible_hint(index == DEVICES_TAB, &self.ui);
        self.host.set_current_tab(index);
    }

    pub fn on_pause(&mut self) {
        self.folders.on_pause();
        self.devices.on_pause();
        self.drawer.stop();
    }

    pub fn on_resume(&mut self) {
        self.folders.on_resume(&self.ui);
        self.devices.on_resume(&self.ui);
        if self.drawer.is_open() {
            self.drawer.on_drawer_opened(&self.ui);
        }
    }

    pub fn on_back_pressed(&mut self) -> BackOutcome {
        if self.drawer.is_open() {
            self.close_drawer();
            BackOutcome::DrawerClosed
        } else {
            self.host.finish();
            BackOutcome::Finished
        }
    }

    pub fn on_menu_key(&mut self) {
        if self.drawer.is_open() {
            self.close_drawer();
        } else {
            self.open_drawer();
        }
    }

    pub fn open_drawer(&mut self) {
        self.host.set_drawer_open(true);
        self.drawer.on_drawer_opened(&self.ui);
    }

    pub fn close_drawer(&mut self) {
        self.host.set_drawer_open(false);
        self.drawer.on_drawer_closed();
    }

    fn set_drawer_locked(&mut self, locked: bool) {
        if self.drawer_locked != locked {
            self.drawer_locked = locked;
            self.host.set_drawer_locked(locked);
        }
    }

    pub fn save_state(&self) -> SavedState {
        SavedState {
            current_tab: self.current_tab,
            folders: self.folders.save_state(),
            devices: self.devices.save_state(),
            drawer: DrawerScreenState {
                open: self.drawer.is_open() || self.reopen_drawer,
            },
        }
    }

    /// Stops every timer, closes dialogs and detaches from the connector.
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.folders.on_destroy_view();
        self.devices.on_destroy_view();
        self.drawer.stop();
        self.lifecycle.dismiss_all(self.host.as_mut());
        if let Some(connector) = &self.connector {
            for id in [ListenerId::Main, ListenerId::Folders, ListenerId::Devices] {
                connector.unregister(id);
            }
        }
        info!("Main screen destroyed");
    }

    pub fn folders(&self) -> &FolderListScreen {
        &self.folders
    }

    pub fn devices(&self) -> &DeviceListScreen {
        &self.devices
    }

    pub fn drawer(&self) -> &DrawerScreen {
        &self.drawer
    }

    pub fn current_tab(&self) -> usize {
        self.current_tab
    }

    pub fn is_drawer_locked(&self) -> bool {
        self.drawer_locked
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer.is_open()
    }

    pub fn current_dialog(&self) -> Option<&Modal> {
        self.lifecycle.current()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Drop for MainShell {
    fn drop(&mut self) {
        self.destroy();
    }
}
