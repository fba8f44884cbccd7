use crate::syncthing_client::SyncthingOverview;

use super::dialogs::{DialogKind, Modal};
use super::list::{ListKind, ListRow};
use super::navigation::NavigationIntent;

/// The platform side of the shell: everything that is drawn, navigated to or
/// closed goes through here. Implementations only render; they never call
/// back into the shell directly but post [`UserInput`](super::UserInput)
/// through a [`UiHandle`](super::UiHandle) instead.
pub trait Host: Send {
    /// True once the hosting screen started closing.
    fn is_finishing(&self) -> bool;

    fn finish(&mut self);

    fn start_screen(&mut self, intent: NavigationIntent);

    fn open_url(&mut self, url: &str);

    fn show_dialog(&mut self, modal: &Modal);

    fn dismiss_dialog(&mut self, kind: DialogKind);

    fn render_list(&mut self, list: ListKind, rows: &[ListRow]);

    fn render_overview(&mut self, overview: &SyncthingOverview);

    fn set_drawer_open(&mut self, open: bool);

    fn set_drawer_locked(&mut self, locked: bool);

    fn set_drawer_width(&mut self, width_px: u32);

    fn set_current_tab(&mut self, index: usize);
}
