//! Classification of overview input into controller actions
//!
//! [`dispatch`] is a pure function: it never touches the session. The
//! controller decides whether an action applies in its current state.

use std::fmt;

use crate::geometry::Point;
use crate::navigation::Direction;

/// Keys the overview reacts to, by keysym name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    /// Function key by number (F1 is `F(1)`)
    F(u8),
    Delete,
    Return,
    KpEnter,
    Escape,
    Tab,
    Space,
    Char(char),
}

impl Key {
    /// Parse a keysym name as used in X11/xkb keymaps
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "Up" => Key::Up,
            "Down" => Key::Down,
            "Left" => Key::Left,
            "Right" => Key::Right,
            "Page_Up" | "Prior" => Key::PageUp,
            "Page_Down" | "Next" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Delete" => Key::Delete,
            "Return" | "Enter" => Key::Return,
            "KP_Enter" => Key::KpEnter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "space" => Key::Space,
            _ => {
                let function_key = name
                    .strip_prefix('F')
                    .and_then(|number| number.parse::<u8>().ok());
                if let Some(number) = function_key {
                    if !(1..=35).contains(&number) {
                        return None;
                    }
                    Key::F(number)
                } else {
                    let mut chars = name.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Key::Char(c),
                        _ => return None,
                    }
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::Left => f.write_str("Left"),
            Key::Right => f.write_str("Right"),
            Key::PageUp => f.write_str("Page_Up"),
            Key::PageDown => f.write_str("Page_Down"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::F(n) => write!(f, "F{n}"),
            Key::Delete => f.write_str("Delete"),
            Key::Return => f.write_str("Return"),
            Key::KpEnter => f.write_str("KP_Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::Tab => f.write_str("Tab"),
            Key::Space => f.write_str("space"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Workspace addressed by a page key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceTarget {
    /// Offset from the active workspace
    Relative(i32),
    /// First workspace
    First,
    /// Last workspace
    Last,
}

impl WorkspaceTarget {
    /// Resolve to a workspace index, or None when it falls outside `0..count`
    pub fn resolve(self, active: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        match self {
            WorkspaceTarget::Relative(delta) => {
                let target = active as i64 + i64::from(delta);
                (0..count as i64).contains(&target).then_some(target as usize)
            }
            WorkspaceTarget::First => Some(0),
            WorkspaceTarget::Last => Some(count - 1),
        }
    }
}

/// What a key press asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move the selection cursor
    Navigate(Direction),
    /// Switch the active workspace
    SwitchWorkspace(WorkspaceTarget),
    /// Move the selected window to the workspace at this index
    MoveSelectedToWorkspace(usize),
    /// Close the selected window
    CloseSelected,
    /// Activate the selected window and leave the overview
    ActivateSelected,
    /// Drop the keyboard selection
    CancelSelection,
}

/// Classify a key press
pub fn dispatch(key: Key) -> KeyAction {
    match key {
        Key::Up => KeyAction::Navigate(Direction::Up),
        Key::Down => KeyAction::Navigate(Direction::Down),
        Key::Left => KeyAction::Navigate(Direction::Left),
        Key::Right => KeyAction::Navigate(Direction::Right),
        Key::PageUp => KeyAction::SwitchWorkspace(WorkspaceTarget::Relative(-1)),
        Key::PageDown => KeyAction::SwitchWorkspace(WorkspaceTarget::Relative(1)),
        Key::Home => KeyAction::SwitchWorkspace(WorkspaceTarget::First),
        Key::End => KeyAction::SwitchWorkspace(WorkspaceTarget::Last),
        // F1 means workspace 1, which is at index 0
        Key::F(n @ 1..=12) => KeyAction::MoveSelectedToWorkspace(usize::from(n) - 1),
        Key::Delete => KeyAction::CloseSelected,
        Key::Return | Key::KpEnter => KeyAction::ActivateSelected,
        _ => KeyAction::CancelSelection,
    }
}

/// Decides when pointer motion is deliberate enough to end a selection
///
/// A resting hand on the mouse produces small jitter; only a Manhattan
/// displacement beyond the threshold from where the pointer was when the
/// selection started counts as motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTracker {
    anchor: Point,
    threshold: f64,
}

impl MotionTracker {
    pub fn new(anchor: Point, threshold: f64) -> Self {
        Self { anchor, threshold }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Check whether the pointer at `position` has left the dead zone
    pub fn is_motion(&self, position: Point) -> bool {
        self.anchor.manhattan(position) > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_navigate() {
        assert_eq!(dispatch(Key::Up), KeyAction::Navigate(Direction::Up));
        assert_eq!(dispatch(Key::Down), KeyAction::Navigate(Direction::Down));
        assert_eq!(dispatch(Key::Left), KeyAction::Navigate(Direction::Left));
        assert_eq!(dispatch(Key::Right), KeyAction::Navigate(Direction::Right));
    }

    #[test]
    fn page_keys_switch_workspaces() {
        assert_eq!(
            dispatch(Key::PageDown),
            KeyAction::SwitchWorkspace(WorkspaceTarget::Relative(1))
        );
        assert_eq!(
            dispatch(Key::PageUp),
            KeyAction::SwitchWorkspace(WorkspaceTarget::Relative(-1))
        );
        assert_eq!(
            dispatch(Key::Home),
            KeyAction::SwitchWorkspace(WorkspaceTarget::First)
        );
        assert_eq!(
            dispatch(Key::End),
            KeyAction::SwitchWorkspace(WorkspaceTarget::Last)
        );
    }

    #[test]
    fn function_keys_map_to_zero_based_workspaces() {
        assert_eq!(dispatch(Key::F(1)), KeyAction::MoveSelectedToWorkspace(0));
        assert_eq!(dispatch(Key::F(12)), KeyAction::MoveSelectedToWorkspace(11));
        assert_eq!(dispatch(Key::F(13)), KeyAction::CancelSelection);
    }

    #[test]
    fn window_actions_and_fallback() {
        assert_eq!(dispatch(Key::Delete), KeyAction::CloseSelected);
        assert_eq!(dispatch(Key::Return), KeyAction::ActivateSelected);
        assert_eq!(dispatch(Key::KpEnter), KeyAction::ActivateSelected);
        assert_eq!(dispatch(Key::Escape), KeyAction::CancelSelection);
        assert_eq!(dispatch(Key::Char('a')), KeyAction::CancelSelection);
    }

    #[test]
    fn key_names_round_trip_through_display() {
        for name in ["Up", "Page_Down", "Home", "F7", "Delete", "Return", "KP_Enter", "x"] {
            let key = Key::from_name(name).unwrap();
            assert_eq!(key.to_string(), name);
        }
        assert_eq!(Key::from_name("Prior"), Some(Key::PageUp));
        assert_eq!(Key::from_name("F0"), None);
        assert_eq!(Key::from_name("NotAKey"), None);
    }

    #[test]
    fn workspace_targets_stay_in_range() {
        assert_eq!(WorkspaceTarget::Relative(1).resolve(0, 4), Some(1));
        assert_eq!(WorkspaceTarget::Relative(1).resolve(3, 4), None);
        assert_eq!(WorkspaceTarget::Relative(-1).resolve(0, 4), None);
        assert_eq!(WorkspaceTarget::First.resolve(2, 4), Some(0));
        assert_eq!(WorkspaceTarget::Last.resolve(0, 4), Some(3));
        assert_eq!(WorkspaceTarget::Last.resolve(0, 0), None);
    }

    #[test]
    fn motion_within_threshold_is_jitter() {
        let tracker = MotionTracker::new(Point::new(100.0, 100.0), 5.0);
        assert!(!tracker.is_motion(Point::new(102.0, 103.0)));
        assert!(tracker.is_motion(Point::new(103.0, 103.0)));
        assert!(tracker.is_motion(Point::new(90.0, 100.0)));
    }
}
