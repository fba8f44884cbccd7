use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use syncthing_shell::config::{first_install_time, Config};
use syncthing_shell::service::{MonitorSettings, ServiceMonitor, ServiceState, StateBroadcaster};
use syncthing_shell::syncthing_client::{RestApi, SyncthingClient, SyncthingOverview};
use syncthing_shell::ui::{
    ui_channel, DialogKind, DisabledChoice, DisplayMetrics, DrawerAction, Host, LaunchOptions,
    ListKind, ListRow, MainShell, Modal, NavigationIntent, SavedState, UiHandle,
    UsageReportChoice, UserInput,
};

/// Terminal stand-in for the platform: prints whatever the shell asks it to draw.
#[derive(Default)]
struct ConsoleHost {
    finishing: bool,
}

impl Host for ConsoleHost {
    fn is_finishing(&self) -> bool {
        self.finishing
    }

    fn finish(&mut self) {
        self.finishing = true;
        println!("[closing]");
    }

    fn start_screen(&mut self, intent: NavigationIntent) {
        match intent.to_payload() {
            Ok(payload) => println!("[navigate] {payload}"),
            Err(err) => warn!(error = ?err, "Failed to encode navigation intent"),
        }
    }

    fn open_url(&mut self, url: &str) {
        println!("[open] {url}");
    }

    fn show_dialog(&mut self, modal: &Modal) {
        if let Some(title) = modal.title() {
            println!("== {title} ==");
        }
        println!("{}", modal.message());
        match modal {
            Modal::Disabled => println!("(settings / exit)"),
            Modal::UsageReport { .. } => println!("(yes / no / website)"),
            Modal::Loading { .. } => {}
        }
    }

    fn dismiss_dialog(&mut self, kind: DialogKind) {
        tracing::debug!(?kind, "Dialog dismissed");
    }

    fn render_list(&mut self, list: ListKind, rows: &[ListRow]) {
        println!("-- {list:?} ({}) --", rows.len());
        for (position, row) in rows.iter().enumerate() {
            let status = row.status.as_deref().unwrap_or("-");
            match &row.subtitle {
                Some(subtitle) => println!("{position:>3} {} [{status}] {subtitle}", row.title),
                None => println!("{position:>3} {} [{status}]", row.title),
            }
        }
    }

    fn render_overview(&mut self, overview: &SyncthingOverview) {
        println!(
            "-- Syncthing {} | {} | up {} --",
            overview.version.as_deref().unwrap_or("?"),
            overview.short_id().unwrap_or("?"),
            overview.uptime_label().unwrap_or_else(|| "?".to_string()),
        );
    }

    fn set_drawer_open(&mut self, open: bool) {
        println!("[drawer {}]", if open { "open" } else { "closed" });
    }

    fn set_drawer_locked(&mut self, locked: bool) {
        tracing::debug!(locked, "Drawer lock changed");
    }

    fn set_drawer_width(&mut self, width_px: u32) {
        tracing::debug!(width_px, "Drawer width");
    }

    fn set_current_tab(&mut self, index: usize) {
        println!("[tab {index}]");
    }
}

fn parse_command(line: &str, current_list: &mut ListKind) -> Option<UserInput> {
    let mut words = line.split_whitespace();
    let input = match (words.next()?, words.next()) {
        ("tab", Some(index)) => {
            let index: usize = index.parse().ok()?;
            *current_list = if index == 1 {
                ListKind::Devices
            } else {
                ListKind::Folders
            };
            UserInput::TabSelected(index)
        }
        ("open", Some(position)) => UserInput::ItemClicked {
            list: *current_list,
            position: position.parse().ok()?,
        },
        ("scroll", Some(offset)) => UserInput::Scrolled {
            list: *current_list,
            offset: offset.parse().ok()?,
        },
        ("back", _) => UserInput::BackPressed,
        ("menu", _) => UserInput::MenuKey,
        ("add", _) => UserInput::AddItem,
        ("refresh", _) => UserInput::Refresh,
        ("pause", _) => UserInput::Pause,
        ("resume", _) => UserInput::Resume,
        ("yes", _) => UserInput::UsageReportAnswer(UsageReportChoice::Accept),
        ("no", _) => UserInput::UsageReportAnswer(UsageReportChoice::Deny),
        ("website", _) => UserInput::UsageReportAnswer(UsageReportChoice::LearnMore),
        ("settings", _) => UserInput::DisabledDialogAnswer(DisabledChoice::ChangeSettings),
        ("exit", _) => UserInput::DisabledDialogAnswer(DisabledChoice::Exit),
        ("gui", _) => UserInput::DrawerAction(DrawerAction::WebGui),
        ("quit", _) => UserInput::Destroy,
        _ => return None,
    };
    Some(input)
}

fn spawn_input_reader(ui: UiHandle) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut current_list = ListKind::Folders;
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line, &mut current_list) {
                    Some(input) => {
                        if !ui.input(input) {
                            break;
                        }
                    }
                    None => warn!(command = %line.trim(), "Unknown command"),
                },
                Ok(None) => {
                    ui.input(UserInput::Destroy);
                    break;
                }
                Err(err) => {
                    error!(error = %err, "Failed to read stdin");
                    ui.input(UserInput::Destroy);
                    break;
                }
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = Config::load().await;
    let first_install = match Config::install_marker_path() {
        Ok(marker) => first_install_time(&marker).await,
        Err(err) => {
            warn!(error = ?err, "No install marker, assuming an old install");
            chrono::DateTime::<Utc>::UNIX_EPOCH
        }
    };
    let launch = LaunchOptions {
        first_start: config.is_first_start(),
        first_install,
    };

    let state_path = Config::saved_state_path().ok();
    let saved = match &state_path {
        Some(path) => SavedState::load(path).await,
        None => None,
    };

    let broadcaster = Arc::new(StateBroadcaster::new());
    let (ui, mut ui_loop) = ui_channel();
    let mut shell = MainShell::new(Box::new(ConsoleHost::default()), ui.clone(), launch, saved);
    shell.layout(DisplayMetrics {
        width_px: 1404,
        height_px: 1872,
        action_bar_px: 112,
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    match SyncthingClient::discover(&config).await {
        Ok(client) => {
            info!(base_url = client.base_url(), "Using Syncthing API");
            let api: Arc<dyn RestApi> = Arc::new(client.clone());
            shell.on_service_connected(Arc::clone(&broadcaster), Some(api));
            let monitor = ServiceMonitor::new(
                client,
                Arc::clone(&broadcaster),
                MonitorSettings::from(&config),
            );
            tokio::spawn(monitor.run(shutdown_rx));
        }
        Err(err) => {
            error!(error = ?err, "Cannot talk to Syncthing");
            shell.on_service_connected(Arc::clone(&broadcaster), None);
            broadcaster.set_state(ServiceState::Error);
        }
    }

    ui.input(UserInput::Resume);
    spawn_input_reader(ui);
    ui_loop.run(&mut shell).await;
    let _ = shutdown_tx.send(true);

    if let Some(path) = state_path {
        if let Err(err) = shell.save_state().save(&path).await {
            warn!(error = ?err, "Failed to persist UI state");
        }
    }
}
