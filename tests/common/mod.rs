//! Common testing utilities for overview-nav integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use overview_nav::error::{NavError, NavResult};
use overview_nav::geometry::{LiveGeometry, Point, Rect};
use overview_nav::host::{HostAdapter, HostSignal, SubscriptionId, TimeoutId};
use overview_nav::window::WindowId;

/// Host with fixed thumbnail rectangles that records every call made on it
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub windows: Vec<(WindowId, Rect)>,
    pub focus: Option<WindowId>,
    pub pointer: Point,
    pub windows_page: bool,
    pub workspaces: usize,
    pub active_workspace: usize,
    /// Every highlight request in order
    pub highlights: Vec<(WindowId, Rect)>,
    pub unhighlights: Vec<(WindowId, bool)>,
    /// Currently set focus hints
    pub focus_hints: Vec<WindowId>,
    pub closed: Vec<WindowId>,
    pub activated: Vec<WindowId>,
    pub moved: Vec<(WindowId, usize)>,
    pub switched: Vec<usize>,
    pub subscriptions: BTreeMap<SubscriptionId, HostSignal>,
    pub timeouts: BTreeMap<TimeoutId, Duration>,
    /// Window actions in call order, including failed ones
    pub calls: Vec<(&'static str, WindowId)>,
    /// Windows the host pretends are gone for actions
    pub vanished: Vec<WindowId>,
    next_handle: u64,
}

impl RecordingHost {
    /// Create a host whose window `i` (id `i + 1`) has `rects[i]`
    pub fn with_rects(rects: &[Rect]) -> Self {
        Self {
            windows: rects
                .iter()
                .enumerate()
                .map(|(i, rect)| (id(i as u64 + 1), *rect))
                .collect(),
            windows_page: true,
            workspaces: 4,
            ..Self::default()
        }
    }

    /// Square thumbnails of size `side` centered on each point
    pub fn with_centers(centers: &[(f64, f64)], side: f64) -> Self {
        let rects: Vec<Rect> = centers
            .iter()
            .map(|&(x, y)| Rect::centered(Point::new(x, y), side, side))
            .collect();
        Self::with_rects(&rects)
    }

    /// The most recently highlighted window
    pub fn last_highlight(&self) -> Option<WindowId> {
        self.highlights.last().map(|(window, _)| *window)
    }

    pub fn listens_to(&self, signal: HostSignal) -> bool {
        self.subscriptions.values().any(|connected| *connected == signal)
    }

    /// Only pending timeout, if exactly one is pending
    pub fn pending_timeout(&self) -> Option<TimeoutId> {
        match self.timeouts.keys().collect::<Vec<_>>()[..] {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn known(&self, window: WindowId) -> NavResult<()> {
        let listed = self.windows.iter().any(|(id, _)| *id == window);
        if listed && !self.vanished.contains(&window) {
            Ok(())
        } else {
            Err(NavError::StaleReference(window))
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl HostAdapter for RecordingHost {
    fn list_selectable_windows(&self) -> Vec<WindowId> {
        self.windows.iter().map(|(id, _)| *id).collect()
    }

    fn current_focus_window(&self) -> Option<WindowId> {
        self.focus
    }

    fn live_geometry(&self, window: WindowId) -> Option<LiveGeometry> {
        self.windows
            .iter()
            .find(|(id, _)| *id == window)
            .map(|(_, rect)| LiveGeometry::new(*rect, 0.5))
    }

    fn monitor_work_area(&self, _window: WindowId) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 1920.0, 1080.0))
    }

    fn windows_page_active(&self) -> bool {
        self.windows_page
    }

    fn pointer_position(&self) -> Point {
        self.pointer
    }

    fn highlight(&mut self, window: WindowId, zoom: Rect) -> NavResult<()> {
        self.known(window)?;
        self.highlights.push((window, zoom));
        Ok(())
    }

    fn unhighlight(&mut self, window: WindowId, reset_geometry: bool) -> NavResult<()> {
        self.calls.push(("unhighlight", window));
        self.known(window)?;
        self.unhighlights.push((window, reset_geometry));
        Ok(())
    }

    fn set_focus_hint(&mut self, window: WindowId, focused: bool) {
        self.focus_hints.retain(|hinted| *hinted != window);
        if focused {
            self.focus_hints.push(window);
        }
    }

    fn close_window(&mut self, window: WindowId) -> NavResult<()> {
        self.calls.push(("close", window));
        self.known(window)?;
        self.windows.retain(|(id, _)| *id != window);
        self.closed.push(window);
        Ok(())
    }

    fn activate_window(&mut self, window: WindowId) -> NavResult<()> {
        self.known(window)?;
        self.activated.push(window);
        Ok(())
    }

    fn move_window_to_workspace(&mut self, window: WindowId, workspace: usize) -> NavResult<()> {
        self.calls.push(("move", window));
        self.known(window)?;
        self.windows.retain(|(id, _)| *id != window);
        self.moved.push((window, workspace));
        Ok(())
    }

    fn workspace_count(&self) -> usize {
        self.workspaces
    }

    fn active_workspace_index(&self) -> usize {
        self.active_workspace
    }

    fn activate_workspace(&mut self, index: usize) {
        self.active_workspace = index;
        self.switched.push(index);
    }

    fn subscribe(&mut self, signal: HostSignal) -> SubscriptionId {
        let id = SubscriptionId(self.next_handle());
        self.subscriptions.insert(id, signal);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }

    fn add_timeout(&mut self, delay: Duration) -> TimeoutId {
        let id = TimeoutId(self.next_handle());
        self.timeouts.insert(id, delay);
        id
    }

    fn remove_timeout(&mut self, id: TimeoutId) {
        self.timeouts.remove(&id);
    }
}

pub fn id(raw: u64) -> WindowId {
    WindowId::from_raw(raw).expect("window ids start at 1")
}

/// Two rows of two 150x150 thumbnails centered on (100,100), (300,100),
/// (100,300) and (300,300)
pub fn grid() -> RecordingHost {
    RecordingHost::with_centers(
        &[(100.0, 100.0), (300.0, 100.0), (100.0, 300.0), (300.0, 300.0)],
        150.0,
    )
}

/// One row of `count` 100x100 thumbnails, 200 apart
pub fn row(count: usize) -> RecordingHost {
    let centers: Vec<(f64, f64)> = (0..count).map(|i| (100.0 + i as f64 * 200.0, 100.0)).collect();
    RecordingHost::with_centers(&centers, 100.0)
}
