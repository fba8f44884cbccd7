mod devices;
mod dialogs;
mod drawer;
mod event_loop;
mod folders;
mod host;
mod list;
mod navigation;
mod poller;
mod saved_state;
mod shell;

pub use devices::{DeviceListScreen, DeviceSource};
pub use dialogs::{
    should_prompt_usage_reporting, DialogController, DialogKind, DisabledChoice, LifecycleAction,
    LifecycleDialogController, Modal, UsageReportChoice, USAGE_DATA_URL,
    USAGE_REPORTING_DIALOG_DELAY,
};
pub use drawer::{DrawerAction, DrawerScreen};
pub use event_loop::{
    ui_channel, ScheduledEvent, ScreenId, UiEvent, UiHandle, UiLoop, UiStateListener, UserInput,
};
pub use folders::{FolderListScreen, FolderSource};
pub use host::Host;
pub use list::{ListAdapter, ListItem, ListKind, ListRow, ListScreen, ListSource};
pub use navigation::{Destination, NavigationIntent};
pub use poller::{PollGate, PollState, Poller, GUI_UPDATE_INTERVAL};
pub use saved_state::{DrawerScreenState, ListScreenState, SavedState};
pub use shell::{
    optimal_drawer_width, BackOutcome, DisplayMetrics, LaunchOptions, MainShell, DEVICES_TAB,
    FOLDERS_TAB, TAB_COUNT,
};
