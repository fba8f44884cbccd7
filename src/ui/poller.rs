use std::time::Duration;

use tracing::trace;

use super::event_loop::{ScheduledEvent, ScreenId, UiEvent, UiHandle};

/// Period between two list refreshes while a screen is polling.
pub const GUI_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Stopped,
    Armed,
}

/// Combines the visibility hint and the pause/resume lifecycle into the state
/// a screen's poller should be in: armed iff visible and not paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollGate {
    visible: bool,
    paused: bool,
}

impl Default for PollGate {
    /// Not visible, and paused until the first resume.
    fn default() -> Self {
        Self {
            visible: false,
            paused: true,
        }
    }
}

impl PollGate {
    pub fn with_last_visible(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn set_visible(&mut self, visible: bool) -> PollState {
        self.visible = visible;
        self.desired()
    }

    pub fn pause(&mut self) -> PollState {
        self.paused = true;
        self.desired()
    }

    pub fn resume(&mut self) -> PollState {
        self.paused = false;
        self.desired()
    }

    pub fn last_visible(&self) -> bool {
        self.visible
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn desired(&self) -> PollState {
        if self.visible && !self.paused {
            PollState::Armed
        } else {
            PollState::Stopped
        }
    }
}

/// Repeating UI-context timer for one screen.
///
/// At most one tick is outstanding. Every `start`/`stop` bumps the
/// generation, and ticks carrying an older generation are ignored, which
/// covers ticks that were already queued when the timer was cancelled.
#[derive(Debug)]
pub struct Poller {
    screen: ScreenId,
    interval: Duration,
    state: PollState,
    generation: u64,
    pending: Option<ScheduledEvent>,
}

impl Poller {
    pub fn new(screen: ScreenId) -> Self {
        Self::with_interval(screen, GUI_UPDATE_INTERVAL)
    }

    pub fn with_interval(screen: ScreenId, interval: Duration) -> Self {
        Self {
            screen,
            interval,
            state: PollState::Stopped,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == PollState::Armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Clears any outstanding tick and posts a fresh one immediately.
    pub fn start(&mut self, ui: &UiHandle) {
        trace!(screen = ?self.screen, "Starting update timer");
        self.remove_callbacks();
        self.state = PollState::Armed;
        ui.post(self.tick_event());
    }

    pub fn stop(&mut self) {
        if self.state == PollState::Armed {
            trace!(screen = ?self.screen, "Stopping update timer");
        }
        self.remove_callbacks();
        self.state = PollState::Stopped;
    }

    pub fn apply(&mut self, desired: PollState, ui: &UiHandle) {
        match desired {
            PollState::Armed => self.start(ui),
            PollState::Stopped => self.stop(),
        }
    }

    /// Validates a delivered tick and, if it is current, schedules the next
    /// one a full interval from now. Returns whether the tick should run.
    pub fn accept_tick(&mut self, generation: u64, ui: &UiHandle) -> bool {
        if self.state != PollState::Armed || generation != self.generation {
            trace!(
                screen = ?self.screen,
                generation,
                current = self.generation,
                "Dropping stale tick"
            );
            return false;
        }
        self.pending = Some(ui.post_delayed(self.tick_event(), self.interval));
        true
    }

    fn remove_callbacks(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    fn tick_event(&self) -> UiEvent {
        UiEvent::Tick {
            screen: self.screen,
            generation: self.generation,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}
