use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::service::ServiceState;
use crate::syncthing_client::RestApi;

use super::event_loop::{ScreenId, UiHandle};
use super::host::Host;
use super::navigation::NavigationIntent;
use super::poller::{PollGate, Poller};
use super::saved_state::ListScreenState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Folders,
    Devices,
}

/// What the host draws for one list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub status: Option<String>,
}

pub trait ListItem: Clone + Send + Sync + 'static {
    /// Live annotation fetched alongside the item.
    type Status: Clone + Send + Sync + 'static;

    fn item_id(&self) -> &str;

    fn row(&self, status: Option<&Self::Status>) -> ListRow;
}

/// Backing store of a list view.
///
/// Mirrors the usual adapter contract: mutations notify the view unless
/// notifications are suspended, and `notify_data_set_changed` re-enables them.
#[derive(Debug)]
pub struct ListAdapter<T: ListItem> {
    items: Vec<T>,
    statuses: HashMap<String, T::Status>,
    notify_on_change: bool,
    change_notifications: u64,
    scroll_offset: usize,
}

impl<T: ListItem> Default for ListAdapter<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            statuses: HashMap::new(),
            notify_on_change: true,
            change_notifications: 0,
            scroll_offset: 0,
        }
    }
}

impl<T: ListItem> ListAdapter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_notify_on_change(&mut self, notify: bool) {
        self.notify_on_change = notify;
    }

    /// Drops every entity together with its status annotation.
    pub fn clear(&mut self) {
        self.items.clear();
        self.statuses.clear();
        if self.notify_on_change {
            // An observed clear of the whole list sends the view back to the top.
            self.scroll_offset = 0;
            self.notify_data_set_changed();
        }
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
        if self.notify_on_change {
            self.notify_data_set_changed();
        }
    }

    pub fn set_status(&mut self, id: &str, status: T::Status) {
        self.statuses.insert(id.to_string(), status);
    }

    pub fn status(&self, id: &str) -> Option<&T::Status> {
        self.statuses.get(id)
    }

    pub fn notify_data_set_changed(&mut self) {
        let items = &self.items;
        self.statuses
            .retain(|id, _| items.iter().any(|item| item.item_id() == id));
        self.scroll_offset = self.scroll_offset.min(self.items.len().saturating_sub(1));
        self.change_notifications += 1;
        self.notify_on_change = true;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.items
            .iter()
            .map(|item| item.row(self.statuses.get(item.item_id())))
            .collect()
    }

    pub fn change_notifications(&self) -> u64 {
        self.change_notifications
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }
}

/// Where a list screen gets its entities and annotations from.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: ListItem;

    const KIND: ListKind;
    const SCREEN: ScreenId;
    const EMPTY_TEXT: &'static str;

    fn fetch(api: &dyn RestApi) -> Option<Vec<Self::Item>>;

    /// Refreshes the live status annotations of every item in `adapter`.
    async fn update_status(adapter: &mut ListAdapter<Self::Item>, api: &dyn RestApi);

    /// Detail screen for `entity_id`, or the creation flow when `None`.
    fn detail_intent(entity_id: Option<String>) -> NavigationIntent;
}

/// A tab showing one entity list, refreshed by its own poller while visible.
pub struct ListScreen<S: ListSource> {
    gate: PollGate,
    poller: Poller,
    adapter: Option<ListAdapter<S::Item>>,
    service_state: ServiceState,
    attached: bool,
    list_shown: bool,
    restored_scroll: usize,
    _source: PhantomData<S>,
}

impl<S: ListSource> Default for ListScreen<S> {
    fn default() -> Self {
        Self::restore(&ListScreenState::default())
    }
}

impl<S: ListSource> ListScreen<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(state: &ListScreenState) -> Self {
        Self {
            gate: PollGate::with_last_visible(state.last_visible_to_user),
            poller: Poller::new(S::SCREEN),
            adapter: None,
            service_state: ServiceState::Init,
            attached: false,
            list_shown: false,
            restored_scroll: state.scroll_offset,
            _source: PhantomData,
        }
    }

    pub fn save_state(&self) -> ListScreenState {
        ListScreenState {
            last_visible_to_user: self.gate.last_visible(),
            scroll_offset: self.scroll_offset(),
        }
    }

    pub fn on_view_created(&mut self) {
        self.attached = true;
    }

    pub fn on_destroy_view(&mut self) {
        self.attached = false;
        self.poller.stop();
    }

    pub fn set_user_visible_hint(&mut self, visible: bool, ui: &UiHandle) {
        let desired = self.gate.set_visible(visible);
        self.poller.apply(desired, ui);
    }

    pub fn on_pause(&mut self) {
        self.gate.pause();
        self.poller.stop();
    }

    pub fn on_resume(&mut self, ui: &UiHandle) {
        let desired = self.gate.resume();
        self.poller.apply(desired, ui);
    }

    pub fn on_service_state_change(&mut self, state: ServiceState) {
        self.service_state = state;
    }

    pub fn on_scrolled(&mut self, offset: usize) {
        match self.adapter.as_mut() {
            Some(adapter) => adapter.set_scroll_offset(offset),
            None => self.restored_scroll = offset,
        }
    }

    /// Handles a tick addressed to this screen's poller.
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
        self.on_timer_event(host, api).await;
    }

    async fn on_timer_event(&mut self, host: &mut dyn Host, api: Option<&dyn RestApi>) {
        if self.service_state != ServiceState::Active {
            return;
        }
        if host.is_finishing() {
            return;
        }
        let Some(api) = api else {
            return;
        };
        trace!(list = ?S::KIND, "Invoking update_list");
        self.update_list(host, api).await;
    }

    /// Explicit invalidation; follows the same skip rules as a timer tick.
    pub async fn refresh(&mut self, host: &mut dyn Host, api: Option<&dyn RestApi>) {
        self.on_timer_event(host, api).await;
    }

    /// Replaces the displayed entities with a fresh snapshot, creating the
    /// adapter on first use.
    async fn update_list(&mut self, host: &mut dyn Host, api: &dyn RestApi) {
        if !self.attached || host.is_finishing() {
            return;
        }
        if !api.is_config_loaded() {
            return;
        }
        let Some(items) = S::fetch(api) else {
            return;
        };

        let restored_scroll = self.restored_scroll;
        let adapter = self.adapter.get_or_insert_with(|| {
            let mut adapter = ListAdapter::new();
            adapter.set_scroll_offset(restored_scroll);
            adapter
        });

        // Keep the scroll position: the clear must not reach the view.
        adapter.set_notify_on_change(false);
        adapter.clear();
        adapter.add_all(items);
        S::update_status(adapter, api).await;
        adapter.notify_data_set_changed();

        host.render_list(S::KIND, &adapter.rows());
        self.list_shown = true;
        debug!(list = ?S::KIND, count = adapter.len(), "List refreshed");
    }

    pub fn on_item_click(&self, position: usize, host: &mut dyn Host) {
        let Some(item) = self.adapter.as_ref().and_then(|adapter| adapter.item(position)) else {
            return;
        };
        host.start_screen(S::detail_intent(Some(item.item_id().to_string())));
    }

    /// The menu's "add" action.
    pub fn on_add(&self, host: &mut dyn Host) {
        host.start_screen(S::detail_intent(None));
    }

    pub fn adapter(&self) -> Option<&ListAdapter<S::Item>> {
        self.adapter.as_ref()
    }

    /// Whether the list replaced the empty-state placeholder.
    pub fn is_list_shown(&self) -> bool {
        self.list_shown
    }

    pub fn empty_text(&self) -> &'static str {
        S::EMPTY_TEXT
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_armed()
    }

    pub fn is_visible(&self) -> bool {
        self.gate.last_visible()
    }

    pub fn service_state(&self) -> ServiceState {
        self.service_state
    }

    pub fn scroll_offset(&self) -> usize {
        self.adapter
            .as_ref()
            .map(|adapter| adapter.scroll_offset())
            .unwrap_or(self.restored_scroll)
    }
}
