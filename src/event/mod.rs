//! Events delivered by the host into the controller
//!
//! The host translates its own signals into these types and hands them to
//! [`crate::controller::KeyController::handle_event`] in delivery order.

use crate::geometry::Point;
use crate::host::{HostSignal, TimeoutId};
use crate::keybindings::Key;

/// Lifecycle events of the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A thumbnail finished its opening animation
    WindowReady,
    /// Thumbnails are about to be repositioned
    WindowPositioningInit,
    /// The reposition animation started
    WindowPositioningStarted,
    /// The reposition animation finished
    WindowPositioningFinished,
    /// A window appeared on a monitor (opened or moved in)
    WindowEnteredMonitor,
    /// A window disappeared from a monitor (closed or moved away)
    WindowLeftMonitor,
    /// A thumbnail drag started
    DragBegin,
    /// A thumbnail drag ended
    DragEnd,
    /// The overview started hiding
    OverviewHiding,
    /// The active workspace changed
    WorkspaceSwitched,
    /// A timeout scheduled through the host fired
    TimeoutElapsed(TimeoutId),
}

impl HostEvent {
    /// The signal this event is delivered through, if any
    pub fn signal(&self) -> Option<HostSignal> {
        let signal = match self {
            HostEvent::WindowReady => HostSignal::WindowReady,
            HostEvent::WindowPositioningInit => HostSignal::WindowPositioningInit,
            HostEvent::WindowPositioningStarted => HostSignal::WindowPositioningStarted,
            HostEvent::WindowPositioningFinished => HostSignal::WindowPositioningFinished,
            HostEvent::WindowEnteredMonitor => HostSignal::WindowEnteredMonitor,
            HostEvent::WindowLeftMonitor => HostSignal::WindowLeftMonitor,
            HostEvent::DragBegin => HostSignal::DragBegin,
            HostEvent::DragEnd => HostSignal::DragEnd,
            HostEvent::OverviewHiding => HostSignal::OverviewHiding,
            HostEvent::WorkspaceSwitched => HostSignal::WorkspaceSwitched,
            HostEvent::TimeoutElapsed(_) => return None,
        };
        Some(signal)
    }
}

/// Input-related events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Keyboard key pressed
    KeyPressed(Key),

    /// Pointer button pressed
    ButtonPressed { button: u32 },

    /// Pointer moved
    PointerMoved(Point),
}

impl InputEvent {
    pub fn signal(&self) -> HostSignal {
        match self {
            InputEvent::KeyPressed(_) => HostSignal::KeyPress,
            InputEvent::ButtonPressed { .. } => HostSignal::ButtonPress,
            InputEvent::PointerMoved(_) => HostSignal::PointerMotion,
        }
    }
}

/// Combined event type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Host(HostEvent),
    Input(InputEvent),
}

impl From<HostEvent> for Event {
    fn from(event: HostEvent) -> Self {
        Event::Host(event)
    }
}

impl From<InputEvent> for Event {
    fn from(event: InputEvent) -> Self {
        Event::Input(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_bypass_signal_connections() {
        assert_eq!(HostEvent::TimeoutElapsed(TimeoutId(1)).signal(), None);
        assert_eq!(
            HostEvent::DragBegin.signal(),
            Some(HostSignal::DragBegin)
        );
    }

    #[test]
    fn input_events_map_to_stage_signals() {
        assert_eq!(
            InputEvent::PointerMoved(Point::new(1.0, 2.0)).signal(),
            HostSignal::PointerMotion
        );
        assert_eq!(
            InputEvent::ButtonPressed { button: 1 }.signal(),
            HostSignal::ButtonPress
        );
    }
}
