//! The single cooperative execution context every UI mutation runs on.
//!
//! Producers (timers, the daemon connector, the platform's input layer) only
//! post [`UiEvent`]s. [`UiLoop::run`] hands them to the shell one at a time,
//! so no UI state is ever touched concurrently.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::service::{ListenerId, ServiceState, StateListener};

use super::dialogs::{DisabledChoice, UsageReportChoice};
use super::drawer::DrawerAction;
use super::list::ListKind;
use super::shell::MainShell;

/// Owner of a repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Folders,
    Devices,
    Drawer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ServiceStateChanged {
        listener: ListenerId,
        state: ServiceState,
    },
    Tick {
        screen: ScreenId,
        generation: u64,
    },
    /// Usage report preview fetched off the UI context; `None` if the fetch failed.
    UsageReportLoaded(Option<String>),
    Input(UserInput),
}

/// Input forwarded by the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    TabSelected(usize),
    Pause,
    Resume,
    BackPressed,
    MenuKey,
    Scrolled { list: ListKind, offset: usize },
    ItemClicked { list: ListKind, position: usize },
    /// The add action of the visible tab's menu.
    AddItem,
    Refresh,
    DrawerOpened,
    DrawerClosed,
    DrawerAction(DrawerAction),
    UsageReportAnswer(UsageReportChoice),
    DisabledDialogAnswer(DisabledChoice),
    Destroy,
}

/// Cloneable sender side of the UI context.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiEvent>,
}

/// A delayed event that has not fired yet.
#[derive(Debug)]
pub struct ScheduledEvent {
    handle: AbortHandle,
}

impl ScheduledEvent {
    /// Drops the event if it has not been posted yet. An event already posted
    /// stays in the queue.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl UiHandle {
    /// Queues `event` behind everything already posted. Returns `false` once
    /// the loop is gone.
    pub fn post(&self, event: UiEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Posts `event` after `delay`. Must be called from within a tokio runtime.
    pub fn post_delayed(&self, event: UiEvent, delay: Duration) -> ScheduledEvent {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
        ScheduledEvent {
            handle: task.abort_handle(),
        }
    }

    pub fn input(&self, input: UserInput) -> bool {
        self.post(UiEvent::Input(input))
    }
}

pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

/// Creates a UI context and the handle used to post into it.
pub fn ui_channel() -> (UiHandle, UiLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiHandle { tx }, UiLoop { rx })
}

impl UiLoop {
    pub async fn next_event(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }

    /// Dispatches events to `shell` until it is torn down.
    pub async fn run(&mut self, shell: &mut MainShell) {
        while let Some(event) = self.rx.recv().await {
            trace!(?event, "Dispatching UI event");
            if let ControlFlow::Break(()) = shell.handle_event(event).await {
                break;
            }
        }
    }
}

/// Bridges daemon state broadcasts onto the UI context.
pub struct UiStateListener {
    id: ListenerId,
    ui: UiHandle,
}

impl UiStateListener {
    pub fn new(id: ListenerId, ui: UiHandle) -> Self {
        Self { id, ui }
    }
}

impl StateListener for UiStateListener {
    fn on_service_state_change(&self, state: ServiceState) {
        self.ui.post(UiEvent::ServiceStateChanged {
            listener: self.id,
            state,
        });
    }
}
