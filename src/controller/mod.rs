//! Keyboard navigation controller
//!
//! The controller is the only stateful entry point a host talks to. It owns
//! the [`HostAdapter`], the [`Selection`] and every signal connection and
//! timeout it made, and it reacts to events in delivery order:
//!
//! - key presses are classified by [`dispatch`] and executed here, where
//!   the current state decides whether the action applies;
//! - lifecycle events block navigation while thumbnails move and refresh the
//!   captured overview state once they settled;
//! - pointer input ends a selection in progress.
//!
//! Dropping the controller releases everything it holds on the host.

use bitflags::bitflags;
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::error::{NavError, NavResult};
use crate::event::{Event, HostEvent, InputEvent};
use crate::host::{HostAdapter, HostSignal};
use crate::keybindings::{dispatch, Key, KeyAction, MotionTracker, WorkspaceTarget};
use crate::navigation::Direction;
use crate::scheduler::DeferredRefresh;
use crate::selection::{NavOutcome, Selection};
use crate::subscription::{SubscriptionGroup, SubscriptionLedger};
use crate::window::WindowId;

bitflags! {
    /// Overview conditions tracked next to the selection
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControllerFlags: u8 {
        /// Every thumbnail finished the opening animation
        const READY = 1;
        /// The captured session matches the host's windows
        const UP_TO_DATE = 1 << 1;
        /// A thumbnail is being dragged
        const IN_DRAG = 1 << 2;
        /// The host rejected a window of the session as gone
        const STALE = 1 << 3;
    }
}

/// Signals connected for the controller's whole lifetime
pub const PERMANENT_SIGNALS: &[HostSignal] = &[
    HostSignal::KeyPress,
    HostSignal::WindowEnteredMonitor,
    HostSignal::WindowLeftMonitor,
    HostSignal::DragBegin,
    HostSignal::DragEnd,
    HostSignal::WorkspaceSwitched,
    HostSignal::OverviewHiding,
];

/// Signals connected until the overview finished opening
pub const INIT_SIGNALS: &[HostSignal] = &[HostSignal::WindowReady];

/// Signals of the active workspace, reconnected on every switch
pub const TRANSIENT_SIGNALS: &[HostSignal] = &[
    HostSignal::WindowPositioningInit,
    HostSignal::WindowPositioningStarted,
    HostSignal::WindowPositioningFinished,
];

/// Signals connected while a selection is in progress
pub const SELECTION_SIGNALS: &[HostSignal] = &[HostSignal::ButtonPress, HostSignal::PointerMotion];

/// Spatial keyboard navigation for one open overview
pub struct KeyController<H: HostAdapter> {
    host: H,
    config: Config,
    selection: Selection,
    flags: ControllerFlags,
    ledger: SubscriptionLedger,
    refresh: DeferredRefresh,
    motion: Option<MotionTracker>,
    ready_count: usize,
    disposed: bool,
}

impl<H: HostAdapter> KeyController<H> {
    /// Attach to a freshly opened overview
    pub fn new(mut host: H, config: Config) -> Self {
        let mut ledger = SubscriptionLedger::new();
        ledger.connect(&mut host, SubscriptionGroup::Permanent, PERMANENT_SIGNALS);
        ledger.connect(&mut host, SubscriptionGroup::Init, INIT_SIGNALS);
        ledger.connect(&mut host, SubscriptionGroup::Transient, TRANSIENT_SIGNALS);

        let mut controller = Self {
            host,
            selection: Selection::new(config.selection_options()),
            config,
            flags: ControllerFlags::empty(),
            ledger,
            refresh: DeferredRefresh::new(),
            motion: None,
            ready_count: 0,
            disposed: false,
        };

        // An empty overview never reports a ready thumbnail
        if controller.host.list_selectable_windows().is_empty() {
            controller.finish_init();
        }
        info!("Keyboard navigation attached");
        controller
    }

    /// Feed one event from the host
    pub fn handle_event(&mut self, event: impl Into<Event>) {
        match event.into() {
            Event::Host(event) => self.handle_host_event(event),
            Event::Input(event) => self.handle_input(event),
        }
    }

    /// React to pointer and keyboard input
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.accepts(Some(event.signal())) {
            trace!("Ignoring {event:?}");
            return;
        }
        match event {
            InputEvent::KeyPressed(key) => self.on_key_press(key),
            InputEvent::ButtonPressed { button } => {
                if self.selection.is_selecting() {
                    debug!("Button {button} pressed, ending selection");
                    self.end_selection(true, true);
                }
            }
            InputEvent::PointerMoved(position) => {
                let moved = self
                    .motion
                    .is_some_and(|tracker| tracker.is_motion(position));
                if moved && self.selection.is_selecting() {
                    debug!("Pointer moved to ({}, {}), ending selection", position.x, position.y);
                    self.end_selection(true, false);
                }
            }
        }
    }

    /// React to an overview lifecycle event
    pub fn handle_host_event(&mut self, event: HostEvent) {
        if !self.accepts(event.signal()) {
            trace!("Ignoring {event:?}");
            return;
        }
        if self.flags.contains(ControllerFlags::STALE) {
            self.recover_stale();
        }

        match event {
            HostEvent::WindowReady => self.on_window_ready(),
            HostEvent::WindowPositioningInit => self.selection.set_blocked(true),
            HostEvent::WindowPositioningStarted => self.on_window_positioning_started(),
            HostEvent::WindowPositioningFinished => {
                if self.refresh.cancel(&mut self.host) {
                    debug!("Reposition finished before the deferred refresh");
                    self.on_refresh_due();
                }
            }
            HostEvent::TimeoutElapsed(id) => {
                if self.refresh.fire(id) {
                    self.on_refresh_due();
                }
            }
            HostEvent::WindowEnteredMonitor | HostEvent::WindowLeftMonitor => {
                self.flags.remove(ControllerFlags::UP_TO_DATE);
                self.update_overview_state(false);
            }
            HostEvent::DragBegin => {
                self.selection.set_blocked(true);
                self.flags.insert(ControllerFlags::IN_DRAG);
            }
            HostEvent::DragEnd => {
                self.selection.set_blocked(false);
                self.flags.remove(ControllerFlags::IN_DRAG);
            }
            HostEvent::WorkspaceSwitched => {
                self.ledger
                    .disconnect_group(&mut self.host, SubscriptionGroup::Transient);
                self.ledger.connect(
                    &mut self.host,
                    SubscriptionGroup::Transient,
                    TRANSIENT_SIGNALS,
                );
                self.update_overview_state(true);
            }
            HostEvent::OverviewHiding => self.end_selection(false, true),
        }
    }

    /// Refresh the captured overview state unless that would disturb the user
    ///
    /// Nothing happens while navigation is blocked or a selection is in
    /// progress. `reset_selection` drops the previous session first.
    pub fn update_overview_state(&mut self, reset_selection: bool) {
        if self.selection.is_blocked() || self.selection.is_selecting() {
            trace!("Overview state update postponed");
            return;
        }
        if reset_selection {
            self.end_selection(false, true);
        }
        self.refresh_overview();
    }

    /// Capture the host's windows and geometry into a new session
    #[profiling::function]
    pub fn refresh_overview(&mut self) {
        if self.selection.is_active() {
            self.end_selection(false, true);
        }
        let windows = self.host.list_selectable_windows();
        let focus = self.host.current_focus_window();
        let result = self.selection.begin_session(&mut self.host, &windows, focus);
        self.report(result);
        if self.selection.take_stale() {
            debug!("Some windows vanished while refreshing");
        }
        self.flags.insert(ControllerFlags::UP_TO_DATE);
    }

    /// Refresh right away when the last window of the workspace went away
    ///
    /// Without windows the host does not animate, so no deferred refresh
    /// would ever unblock navigation.
    pub fn manual_update_check(&mut self) {
        if self.host.list_selectable_windows().is_empty() {
            debug!("Workspace is empty, refreshing without animation");
            self.selection.set_blocked(false);
            self.refresh_overview();
        }
    }

    /// Release every subscription and timeout and drop the session
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.end_selection(false, true);
        self.refresh.cancel(&mut self.host);
        let released = self.ledger.disconnect_all(&mut self.host);
        self.disposed = true;
        info!("Keyboard navigation detached, released {released} connection(s)");
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn flags(&self) -> ControllerFlags {
        self.flags
    }

    /// Number of signal connections currently held on the host
    pub fn subscription_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn accepts(&self, signal: Option<HostSignal>) -> bool {
        if self.disposed {
            return false;
        }
        signal.map_or(true, |signal| self.ledger.listens_to(signal))
    }

    fn on_key_press(&mut self, key: Key) {
        if self.selection.is_blocked() {
            debug!("Navigation blocked, dropping {key}");
            return;
        }
        match dispatch(key) {
            KeyAction::Navigate(direction) => self.on_arrow_key(direction),
            KeyAction::SwitchWorkspace(target) => self.on_page_key(target),
            KeyAction::MoveSelectedToWorkspace(index) => self.on_function_key(index),
            KeyAction::CloseSelected => self.on_delete_key(),
            KeyAction::ActivateSelected => self.on_return_key(),
            KeyAction::CancelSelection => {
                if self.selection.is_selecting() {
                    self.end_selection(true, false);
                }
            }
        }
    }

    fn on_arrow_key(&mut self, direction: Direction) {
        // Avoids popping thumbnails while another page is shown
        if !self.host.windows_page_active() {
            return;
        }
        let needs_refresh = !self.selection.is_active()
            || !self.flags.contains(ControllerFlags::UP_TO_DATE);
        if !self.selection.is_selecting()
            && needs_refresh
            && self.flags.contains(ControllerFlags::READY)
        {
            self.refresh_overview();
        }
        if self.selection.window_count() == 0 {
            return;
        }

        if !self.selection.is_selecting() {
            self.begin_selection();
        }
        let result = self.selection.navigate(&mut self.host, direction);
        if let Some(outcome) = self.report(result) {
            trace!("{outcome:?}");
            if outcome == NavOutcome::Blocked {
                return;
            }
        }
        if self.selection.take_stale() {
            warn!("Selection refers to a window that is gone");
            self.flags.insert(ControllerFlags::STALE);
        }
    }

    fn on_page_key(&mut self, target: WorkspaceTarget) {
        let active = self.host.active_workspace_index();
        let count = self.host.workspace_count();
        let Some(index) = target.resolve(active, count) else {
            return;
        };
        if index == active {
            return;
        }
        self.end_selection(true, true);
        info!("Switching to workspace {index}");
        self.host.activate_workspace(index);
    }

    fn on_function_key(&mut self, index: usize) {
        let Some(window) = self.selection.selected_window() else {
            return;
        };
        if index >= self.host.workspace_count() || index == self.host.active_workspace_index() {
            return;
        }
        self.selection.set_blocked(true);
        info!("Moving {window} to workspace {index}");
        let result = self.host.move_window_to_workspace(window, index);
        self.end_selection(false, true);
        self.after_window_removal(window, result);
    }

    fn on_delete_key(&mut self) {
        let Some(window) = self.selection.selected_window() else {
            return;
        };
        self.selection.set_blocked(true);
        self.end_selection(false, true);
        info!("Closing {window}");
        let result = self.host.close_window(window);
        self.after_window_removal(window, result);
    }

    fn after_window_removal(&mut self, window: WindowId, result: NavResult<()>) {
        match result {
            Ok(()) => self.manual_update_check(),
            Err(err) => {
                // No animation follows a failed removal
                warn!("Could not remove {window}: {err}");
                self.selection.set_blocked(false);
                self.update_overview_state(false);
            }
        }
    }

    fn on_return_key(&mut self) {
        let Some(window) = self.selection.current_window() else {
            return;
        };
        if self.selection.is_selecting() {
            self.end_selection(false, true);
        }
        info!("Activating {window}");
        if let Err(err) = self.host.activate_window(window) {
            warn!("Could not activate {window}: {err}");
            self.flags.insert(ControllerFlags::STALE);
        }
    }

    fn on_window_ready(&mut self) {
        self.ready_count += 1;
        let expected = self.host.list_selectable_windows().len();
        trace!("Window ready {}/{}", self.ready_count, expected);
        if self.ready_count >= expected {
            self.finish_init();
        }
    }

    fn finish_init(&mut self) {
        self.ledger
            .disconnect_group(&mut self.host, SubscriptionGroup::Init);
        self.flags.insert(ControllerFlags::READY);
        if !self.flags.contains(ControllerFlags::IN_DRAG) {
            self.selection.set_blocked(false);
        }
        debug!("Overview finished opening");
        self.update_overview_state(false);
    }

    fn on_window_positioning_started(&mut self) {
        // Not while opening and not for drags, those settle on their own
        if !self.flags.contains(ControllerFlags::READY)
            || self.flags.contains(ControllerFlags::IN_DRAG)
        {
            return;
        }
        self.flags.remove(ControllerFlags::UP_TO_DATE);
        let delay = self.config.refresh_delay();
        self.refresh.schedule(&mut self.host, delay);
    }

    fn on_refresh_due(&mut self) {
        self.selection.set_blocked(false);
        self.update_overview_state(false);
    }

    fn begin_selection(&mut self) {
        self.ledger.connect(
            &mut self.host,
            SubscriptionGroup::Selection,
            SELECTION_SIGNALS,
        );
        let anchor = self.host.pointer_position();
        self.motion = Some(MotionTracker::new(anchor, self.config.motion_threshold));
    }

    /// End the selection and release what belongs to it
    fn end_selection(&mut self, reset_geometry: bool, full_reset: bool) {
        self.selection
            .end_session(&mut self.host, reset_geometry, full_reset);
        self.ledger
            .disconnect_group(&mut self.host, SubscriptionGroup::Selection);
        self.motion = None;
        if full_reset {
            self.flags.remove(ControllerFlags::UP_TO_DATE);
        }
    }

    fn recover_stale(&mut self) {
        debug!("Dropping session with vanished windows");
        self.flags.remove(ControllerFlags::STALE);
        self.end_selection(false, true);
    }

    /// Log a failed selection call; wiring mistakes also trip a debug assertion
    fn report<T>(&self, result: NavResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err @ NavError::InvalidState(_)) => {
                debug_assert!(false, "{err}");
                error!("{err}");
                None
            }
            Err(err) => {
                error!("Selection failed: {err}");
                None
            }
        }
    }
}

impl<H: HostAdapter> Drop for KeyController<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::host::testing::StubHost;

    fn opened(host: StubHost) -> KeyController<StubHost> {
        let count = host.windows.len();
        let mut controller = KeyController::new(host, Config::default());
        for _ in 0..count {
            controller.handle_event(HostEvent::WindowReady);
        }
        controller
    }

    fn pair() -> StubHost {
        StubHost::with_rects(&[
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(200.0, 0.0, 100.0, 100.0),
        ])
    }

    #[test]
    fn opening_connects_then_drops_init_group() {
        let host = pair();
        let mut controller = KeyController::new(host, Config::default());
        let all = PERMANENT_SIGNALS.len() + INIT_SIGNALS.len() + TRANSIENT_SIGNALS.len();
        assert_eq!(controller.subscription_count(), all);
        assert!(!controller.flags().contains(ControllerFlags::READY));

        controller.handle_event(HostEvent::WindowReady);
        assert!(!controller.selection().is_active());
        controller.handle_event(HostEvent::WindowReady);
        assert!(controller.flags().contains(ControllerFlags::READY));
        assert!(controller.flags().contains(ControllerFlags::UP_TO_DATE));
        assert!(controller.selection().is_active());
        assert_eq!(controller.subscription_count(), all - INIT_SIGNALS.len());
    }

    #[test]
    fn empty_overview_is_ready_immediately() {
        let controller = KeyController::new(StubHost::default(), Config::default());
        assert!(controller.flags().contains(ControllerFlags::READY));
        assert_eq!(controller.selection().window_count(), 0);
    }

    #[test]
    fn selection_group_lives_while_selecting() {
        let mut controller = opened(pair());
        controller.handle_event(InputEvent::KeyPressed(Key::Left));
        assert!(controller.selection().is_selecting());
        let during = controller.subscription_count();

        controller.handle_event(InputEvent::KeyPressed(Key::Escape));
        assert!(!controller.selection().is_selecting());
        assert_eq!(
            controller.subscription_count(),
            during - SELECTION_SIGNALS.len()
        );
    }

    #[test]
    fn drag_blocks_and_unblocks() {
        let mut controller = opened(pair());
        controller.handle_event(HostEvent::DragBegin);
        assert!(controller.flags().contains(ControllerFlags::IN_DRAG));
        controller.handle_event(InputEvent::KeyPressed(Key::Left));
        assert!(controller.host().highlighted.is_empty());

        // drags settle without a deferred refresh
        controller.handle_event(HostEvent::WindowPositioningStarted);
        assert!(!controller.refresh_pending());

        controller.handle_event(HostEvent::DragEnd);
        controller.handle_event(InputEvent::KeyPressed(Key::Left));
        assert_eq!(controller.host().highlighted.len(), 1);
    }

    #[test]
    fn dispose_is_idempotent_and_mutes_events() {
        let mut controller = opened(pair());
        controller.handle_event(InputEvent::KeyPressed(Key::Right));
        controller.dispose();
        controller.dispose();
        assert!(controller.is_disposed());
        assert!(controller.host().subscriptions.is_empty());
        assert!(controller.host().timeouts.is_empty());
        assert!(controller.host().focus_hints.is_empty());

        controller.handle_event(InputEvent::KeyPressed(Key::Left));
        assert!(!controller.selection().is_active());
    }
}
