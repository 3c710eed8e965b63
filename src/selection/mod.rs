//! Selection state machine
//!
//! A session is captured whenever the overview state is refreshed and lives
//! until it is ended with a full reset. Inside a session the user is either
//! idle on the initial window or actively selecting with a highlighted
//! thumbnail:
//!
//! ```text
//! Idle --begin_session--> ActiveUnselected --navigate--> ActiveSelected
//!   ^                        ^                               |
//!   |                        +--end_session(_, false)--------+
//!   +------------------------end_session(_, true)------------+
//! ```

pub mod session;

pub use session::SelectionSession;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{NavError, NavResult};
use crate::geometry::zoom::{zoom_target, ZoomParams};
use crate::geometry::SnapshotStore;
use crate::host::HostAdapter;
use crate::navigation::Direction;
use crate::window::WindowId;

/// Coarse state of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No captured overview state
    Idle,
    /// Overview state captured, nothing highlighted
    ActiveUnselected,
    /// A thumbnail is highlighted
    ActiveSelected,
}

/// What happens when an arrow key finds nothing in its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Keep the current window highlighted and do nothing
    #[default]
    Stay,
    /// Highlight the current window again
    Reselect,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Stay => f.write_str("stay"),
            BoundaryPolicy::Reselect => f.write_str("reselect"),
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stay" => Ok(BoundaryPolicy::Stay),
            "reselect" => Ok(BoundaryPolicy::Reselect),
            _ => Err(NavError::Config(format!("Unknown boundary policy: {s}"))),
        }
    }
}

/// Tunables of the selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOptions {
    /// Remember resolved moves so every step is reversible
    pub memory: bool,
    pub boundary: BoundaryPolicy,
    pub zoom: ZoomParams,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            memory: true,
            boundary: BoundaryPolicy::Stay,
            zoom: ZoomParams::default(),
        }
    }
}

/// Result of one arrow-key navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Navigation is blocked, nothing happened
    Blocked,
    /// The session has no windows
    Empty,
    /// First move of a selection with nothing in that direction; the
    /// current window got highlighted
    FirstHighlight(usize),
    /// The cursor moved
    Moved { from: usize, to: usize },
    /// Nothing in that direction
    Unchanged(usize),
    /// Nothing in that direction, the current window was highlighted again
    Reselected(usize),
}

/// Owner of the selection session and its highlight
#[derive(Debug, Default)]
pub struct Selection {
    options: SelectionOptions,
    session: Option<SelectionSession>,
    selecting: bool,
    blocked: bool,
    stale: bool,
}

impl Selection {
    pub fn new(options: SelectionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Capture the overview state into a new session
    ///
    /// Marks the initial window with the focus hint.
    pub fn begin_session<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        windows: &[WindowId],
        focus: Option<WindowId>,
    ) -> NavResult<()> {
        if self.session.is_some() {
            return Err(NavError::InvalidState("a selection session is already live"));
        }
        let mut store = SnapshotStore::new();
        store.refresh(windows, |window| host.live_geometry(window));
        if store.len() < windows.len() {
            self.stale = true;
        }
        let session = SelectionSession::new(store, focus, self.options.memory);
        if let Some(window) = session.initial_window() {
            host.set_focus_hint(window, true);
        }
        debug!(
            "Captured {} window(s), cursor on index {}",
            session.len(),
            session.initial_index()
        );
        self.session = Some(session);
        Ok(())
    }

    /// Move the selection cursor in `direction`
    ///
    /// The first call of a selection always highlights something, even when
    /// nothing lies in that direction.
    pub fn navigate<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        direction: Direction,
    ) -> NavResult<NavOutcome> {
        if self.blocked {
            return Ok(NavOutcome::Blocked);
        }
        let session = self
            .session
            .as_mut()
            .ok_or(NavError::InvalidState("navigate without a selection session"))?;
        if session.is_empty() {
            return Ok(NavOutcome::Empty);
        }

        let first = !self.selecting;
        self.selecting = true;
        let from = session.current_index();

        let outcome = match session.resolve(direction)? {
            Some(to) if to != from => {
                if !first {
                    let previous = session.window(from)?;
                    self.stale |= is_stale(host.unhighlight(previous, true))?;
                }
                session.move_to(direction, to);
                NavOutcome::Moved { from, to }
            }
            _ if first => NavOutcome::FirstHighlight(from),
            _ => match self.options.boundary {
                BoundaryPolicy::Stay => return Ok(NavOutcome::Unchanged(from)),
                BoundaryPolicy::Reselect => NavOutcome::Reselected(from),
            },
        };

        self.highlight_current(host)?;
        debug!("Navigate {direction}: {outcome:?}");
        Ok(outcome)
    }

    fn highlight_current<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> NavResult<()> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let index = session.current_index();
        let window = session.window(index)?;
        let snapshot = session.snapshot(index)?;
        let zoom = zoom_target(snapshot, host.monitor_work_area(window), &self.options.zoom);
        self.stale |= is_stale(host.highlight(window, zoom))?;
        Ok(())
    }

    /// End the selection
    ///
    /// Reverts the highlight if one is shown; `reset_geometry` tells the host
    /// to restore the thumbnail's pre-selection geometry. A full reset drops
    /// the session, otherwise the cursor returns to the initial window so a
    /// new selection can start without a refresh. Never fails.
    pub fn end_session<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        reset_geometry: bool,
        full_reset: bool,
    ) {
        if self.selecting {
            self.selecting = false;
            if let Some(window) = self.session.as_ref().and_then(SelectionSession::current_window)
            {
                if let Err(err) = host.unhighlight(window, reset_geometry) {
                    warn!("Could not revert highlight: {err}");
                }
            }
        }

        if full_reset {
            if let Some(session) = self.session.take() {
                if let Some(window) = session.initial_window() {
                    host.set_focus_hint(window, false);
                }
                debug!("Selection session dropped");
            }
        } else if let Some(session) = self.session.as_mut() {
            session.rewind();
            if let Some(window) = session.initial_window() {
                host.set_focus_hint(window, true);
            }
        }
    }

    /// Block or unblock navigation
    pub fn set_blocked(&mut self, blocked: bool) {
        if self.blocked != blocked {
            debug!("Selection {}", if blocked { "blocked" } else { "unblocked" });
        }
        self.blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Whether a thumbnail is highlighted
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Whether a session is live
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> SelectionState {
        match (&self.session, self.selecting) {
            (None, _) => SelectionState::Idle,
            (Some(_), false) => SelectionState::ActiveUnselected,
            (Some(_), true) => SelectionState::ActiveSelected,
        }
    }

    pub fn session(&self) -> Option<&SelectionSession> {
        self.session.as_ref()
    }

    /// The window under the cursor, highlighted or not
    pub fn current_window(&self) -> Option<WindowId> {
        self.session.as_ref().and_then(SelectionSession::current_window)
    }

    /// The highlighted window, if a selection is in progress
    pub fn selected_window(&self) -> Option<WindowId> {
        if self.selecting {
            self.current_window()
        } else {
            None
        }
    }

    pub fn window_count(&self) -> usize {
        self.session.as_ref().map_or(0, SelectionSession::len)
    }

    /// Report and clear whether the host rejected a window as gone
    pub fn take_stale(&mut self) -> bool {
        std::mem::take(&mut self.stale)
    }
}

/// Turn a stale-reference failure into `Ok(true)`, passing other errors on
fn is_stale(result: NavResult<()>) -> NavResult<bool> {
    match result {
        Ok(()) => Ok(false),
        Err(NavError::StaleReference(window)) => {
            warn!("Skipping host call: {}", NavError::StaleReference(window));
            Ok(true)
        }
        Err(err) => Err(err),
    }
}
