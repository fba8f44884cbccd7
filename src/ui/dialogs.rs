//! Modal dialogs driven by the daemon lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::service::ServiceState;
use crate::syncthing_client::{Options, RestApi};

use super::event_loop::{UiEvent, UiHandle};
use super::host::Host;
use super::navigation::NavigationIntent;

/// Time after the first install before asking about usage reporting.
pub const USAGE_REPORTING_DIALOG_DELAY: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Where the "learn more" answer of the usage reporting dialog leads.
pub const USAGE_DATA_URL: &str = "https://data.syncthing.net";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Loading,
    Disabled,
    UsageReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modal {
    /// Not cancelable. The text depends on whether keys are being generated.
    Loading { first_start: bool },
    Disabled,
    /// `report` is the pretty-printed preview, `None` if it could not be fetched.
    UsageReport { report: Option<String> },
}

impl Modal {
    pub fn kind(&self) -> DialogKind {
        match self {
            Modal::Loading { .. } => DialogKind::Loading,
            Modal::Disabled => DialogKind::Disabled,
            Modal::UsageReport { .. } => DialogKind::UsageReport,
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Modal::Loading { .. } => None,
            Modal::Disabled => Some("Syncthing is disabled"),
            Modal::UsageReport { .. } => Some("Allow anonymous usage reporting?"),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Modal::Loading { first_start: true } => {
                "Generating keys. This may take a while.".to_string()
            }
            Modal::Loading { first_start: false } => "Loading Syncthing".to_string(),
            Modal::Disabled => {
                "Syncthing is not allowed to run with the current settings.".to_string()
            }
            Modal::UsageReport { report: Some(report) } => format!(
                "The encrypted usage report is sent daily. It is used to track common \
                 platforms, folder sizes and app versions.\n\n{report}"
            ),
            Modal::UsageReport { report: None } => "The encrypted usage report is sent daily. \
                 It is used to track common platforms, folder sizes and app versions."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageReportChoice {
    Accept,
    Deny,
    LearnMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledChoice {
    ChangeSettings,
    Exit,
    Cancel,
}

/// Whether the usage reporting question is due: more than
/// [`USAGE_REPORTING_DIALOG_DELAY`] since install and no answer stored yet.
pub fn should_prompt_usage_reporting(
    first_install: DateTime<Utc>,
    now: DateTime<Utc>,
    options: &Options,
) -> bool {
    if options.usage_report_value() != Options::USAGE_REPORTING_UNDECIDED {
        return false;
    }
    (now - first_install)
        .to_std()
        .map(|elapsed| elapsed > USAGE_REPORTING_DIALOG_DELAY)
        .unwrap_or(false)
}

/// Holds the one live modal.
#[derive(Debug, Default)]
pub struct DialogController {
    current: Option<Modal>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `modal` unless the same kind is already live or the host is
    /// finishing. A different live kind is dismissed first.
    pub fn show(&mut self, modal: Modal, host: &mut dyn Host) -> bool {
        if host.is_finishing() {
            return false;
        }
        if let Some(current) = &self.current {
            if current.kind() == modal.kind() {
                return false;
            }
            host.dismiss_dialog(current.kind());
        }
        debug!(kind = ?modal.kind(), "Showing dialog");
        host.show_dialog(&modal);
        self.current = Some(modal);
        true
    }

    pub fn dismiss(&mut self, kind: DialogKind, host: &mut dyn Host) -> bool {
        match &self.current {
            Some(current) if current.kind() == kind => {
                self.current = None;
                host.dismiss_dialog(kind);
                true
            }
            _ => false,
        }
    }

    pub fn dismiss_all(&mut self, host: &mut dyn Host) {
        if let Some(current) = self.current.take() {
            host.dismiss_dialog(current.kind());
        }
    }

    pub fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }

    pub fn is_showing(&self, kind: DialogKind) -> bool {
        self.current.as_ref().map(Modal::kind) == Some(kind)
    }
}

/// What the shell has to do beyond dialogs after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    None,
    /// The daemon became usable: unlock the drawer and refresh its content.
    Activated,
}

/// Maps daemon state changes onto dialogs.
#[derive(Debug)]
pub struct LifecycleDialogController {
    dialogs: DialogController,
    first_start: bool,
    first_install: DateTime<Utc>,
    state: ServiceState,
    usage_report_pending: bool,
}

impl LifecycleDialogController {
    pub fn new(first_start: bool, first_install: DateTime<Utc>) -> Self {
        Self {
            dialogs: DialogController::new(),
            first_start,
            first_install,
            state: ServiceState::Init,
            usage_report_pending: false,
        }
    }

    pub fn on_service_state_change(
        &mut self,
        state: ServiceState,
        host: &mut dyn Host,
        api: Option<&Arc<dyn RestApi>>,
        ui: &UiHandle,
        now: DateTime<Utc>,
    ) -> LifecycleAction {
        self.state = state;
        match state {
            ServiceState::Init => {
                self.show_loading(host);
                LifecycleAction::None
            }
            ServiceState::Starting => {
                self.dialogs.dismiss(DialogKind::Disabled, host);
                self.show_loading(host);
                LifecycleAction::None
            }
            ServiceState::Active => {
                self.dialogs.dismiss(DialogKind::Disabled, host);
                self.dialogs.dismiss(DialogKind::Loading, host);
                if let Some(api) = api {
                    self.maybe_request_usage_report(api, ui, now);
                }
                LifecycleAction::Activated
            }
            ServiceState::Error => {
                info!("Syncthing failed to start, closing");
                host.finish();
                LifecycleAction::None
            }
            ServiceState::Disabled => {
                self.dialogs.dismiss(DialogKind::Loading, host);
                self.dialogs.show(Modal::Disabled, host);
                LifecycleAction::None
            }
        }
    }

    fn show_loading(&mut self, host: &mut dyn Host) {
        let modal = Modal::Loading {
            first_start: self.first_start,
        };
        self.dialogs.show(modal, host);
    }

    fn maybe_request_usage_report(
        &mut self,
        api: &Arc<dyn RestApi>,
        ui: &UiHandle,
        now: DateTime<Utc>,
    ) {
        let Some(options) = api.options() else {
            return;
        };
        if !should_prompt_usage_reporting(self.first_install, now, &options) {
            return;
        }
        if self.usage_report_pending || self.dialogs.is_showing(DialogKind::UsageReport) {
            return;
        }

        self.usage_report_pending = true;
        let api = Arc::clone(api);
        let ui = ui.clone();
        tokio::spawn(async move {
            let report = match api.usage_report().await {
                Ok(report) => Some(report),
                Err(err) => {
                    warn!(error = ?err, "Failed to fetch usage report preview");
                    None
                }
            };
            ui.post(UiEvent::UsageReportLoaded(report));
        });
    }

    /// Shows the usage reporting dialog once the preview arrived, provided the
    /// daemon is still active.
    pub fn on_usage_report_loaded(&mut self, report: Option<String>, host: &mut dyn Host) {
        self.usage_report_pending = false;
        if self.state != ServiceState::Active {
            debug!(state = %self.state, "Dropping usage report, daemon no longer active");
            return;
        }
        self.dialogs.show(Modal::UsageReport { report }, host);
    }

    pub async fn answer_usage_report(
        &mut self,
        choice: UsageReportChoice,
        host: &mut dyn Host,
        api: Option<&dyn RestApi>,
    ) {
        if !self.dialogs.dismiss(DialogKind::UsageReport, host) {
            debug!(?choice, "No usage reporting dialog showing, answer ignored");
            return;
        }
        let value = match choice {
            UsageReportChoice::Accept => Options::USAGE_REPORTING_ACCEPTED,
            UsageReportChoice::Deny => Options::USAGE_REPORTING_DENIED,
            UsageReportChoice::LearnMore => {
                host.open_url(USAGE_DATA_URL);
                return;
            }
        };

        let Some(api) = api else {
            warn!("No API client, usage reporting answer dropped");
            return;
        };
        let (Some(gui), Some(mut options)) = (api.gui(), api.options()) else {
            warn!("Config not loaded, usage reporting answer dropped");
            return;
        };
        options.ur_accepted = value;
        match api.edit_settings(&gui, &options).await {
            Ok(()) => info!(ur_accepted = value, "Stored usage reporting preference"),
            Err(err) => warn!(error = ?err, "Failed to store usage reporting preference"),
        }
    }

    pub fn answer_disabled(&mut self, choice: DisabledChoice, host: &mut dyn Host) {
        if !self.dialogs.dismiss(DialogKind::Disabled, host) {
            debug!(?choice, "No disabled dialog showing, answer ignored");
            return;
        }
        host.finish();
        if choice == DisabledChoice::ChangeSettings {
            host.start_screen(NavigationIntent::settings());
        }
    }

    pub fn dismiss_all(&mut self, host: &mut dyn Host) {
        self.dialogs.dismiss_all(host);
    }

    pub fn current(&self) -> Option<&Modal> {
        self.dialogs.current()
    }

    pub fn is_usage_report_pending(&self) -> bool {
        self.usage_report_pending
    }
}
