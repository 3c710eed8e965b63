//! Interface between the navigation controller and the desktop shell
//!
//! The shell owns windows, layout, animation and the event loop. It hands a
//! concrete [`HostAdapter`] to the controller at construction time and
//! forwards its lifecycle signals as [`crate::event::HostEvent`]s.

use std::fmt;
use std::time::Duration;

use crate::error::NavResult;
use crate::geometry::{LiveGeometry, Point, Rect};
use crate::window::WindowId;

/// Handle of a signal connection made through [`HostAdapter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Handle of a one-shot timeout made through [`HostAdapter::add_timeout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeoutId(pub u64);

impl fmt::Display for TimeoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timeout({})", self.0)
    }
}

/// Host signals the controller listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostSignal {
    /// Key presses on the stage
    KeyPress,
    /// Pointer button presses on the stage
    ButtonPress,
    /// Pointer motion on the stage
    PointerMotion,
    /// A thumbnail reached its place during the overview's opening animation
    WindowReady,
    /// The active workspace is about to reposition its thumbnails
    WindowPositioningInit,
    /// The reposition animation started
    WindowPositioningStarted,
    /// The reposition animation finished
    WindowPositioningFinished,
    /// A window appeared on a monitor
    WindowEnteredMonitor,
    /// A window disappeared from a monitor
    WindowLeftMonitor,
    /// A thumbnail drag started
    DragBegin,
    /// A thumbnail drag ended
    DragEnd,
    /// The active workspace changed
    WorkspaceSwitched,
    /// The overview started hiding
    OverviewHiding,
}

/// Capabilities the shell provides to the navigation controller
///
/// Queries are called synchronously from the controller. Actions on a
/// window return [`crate::error::NavError::StaleReference`] when the window
/// is gone; the controller skips the action and tears the session down on
/// the next lifecycle event.
pub trait HostAdapter {
    /// Selectable windows of the active workspace, followed by those of the
    /// extra per-monitor workspaces
    fn list_selectable_windows(&self) -> Vec<WindowId>;

    /// The window holding input focus, if any
    fn current_focus_window(&self) -> Option<WindowId>;

    /// Current on-screen geometry of a thumbnail
    fn live_geometry(&self, window: WindowId) -> Option<LiveGeometry>;

    /// Work area of the monitor showing the window, panels excluded
    fn monitor_work_area(&self, _window: WindowId) -> Option<Rect> {
        None
    }

    /// Whether the overview currently shows window thumbnails rather than
    /// another page such as the application grid
    fn windows_page_active(&self) -> bool {
        true
    }

    /// Current pointer position
    fn pointer_position(&self) -> Point;

    /// Raise, zoom and highlight a thumbnail
    fn highlight(&mut self, window: WindowId, zoom: Rect) -> NavResult<()>;

    /// Undo [`HostAdapter::highlight`]; `reset_geometry` restores the
    /// pre-selection geometry, otherwise the thumbnail stays as rendered
    fn unhighlight(&mut self, window: WindowId, reset_geometry: bool) -> NavResult<()>;

    /// Mark or unmark the window the cursor starts from
    fn set_focus_hint(&mut self, window: WindowId, focused: bool);

    fn close_window(&mut self, window: WindowId) -> NavResult<()>;

    fn activate_window(&mut self, window: WindowId) -> NavResult<()>;

    fn move_window_to_workspace(&mut self, window: WindowId, workspace: usize) -> NavResult<()>;

    fn workspace_count(&self) -> usize;

    fn active_workspace_index(&self) -> usize;

    fn activate_workspace(&mut self, index: usize);

    /// Connect to a host signal
    fn subscribe(&mut self, signal: HostSignal) -> SubscriptionId;

    /// Disconnect a signal connection; unknown ids are ignored
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Schedule a one-shot [`crate::event::HostEvent::TimeoutElapsed`]
    fn add_timeout(&mut self, delay: Duration) -> TimeoutId;

    /// Cancel a pending timeout; unknown or fired ids are ignored
    fn remove_timeout(&mut self, id: TimeoutId);
}
