//! In-memory overview shell
//!
//! [`SimulatedOverview`] plays the part of the desktop shell for the test
//! binary and the integration tests. It lays the windows of the active
//! workspace out in a grid of scaled thumbnails, keeps track of signal
//! connections and timeouts, and queues the events a real shell would emit
//! in reaction to the controller's actions. The driver drains that queue
//! into the controller with [`SimulatedOverview::take_events`].

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use super::ascii::{AsciiRenderer, AsciiWindow, BoxStyle};
use crate::error::{NavError, NavResult};
use crate::event::{Event, HostEvent};
use crate::geometry::{LiveGeometry, Point, Rect};
use crate::host::{HostAdapter, HostSignal, SubscriptionId, TimeoutId};
use crate::window::WindowId;

/// Monitor size of the simulation
pub const MONITOR_WIDTH: f64 = 1920.0;
pub const MONITOR_HEIGHT: f64 = 1080.0;
/// Top panel excluded from the work area
pub const PANEL_HEIGHT: f64 = 32.0;
/// Margin around the thumbnail grid
const GRID_MARGIN: f64 = 60.0;
/// Space between a thumbnail and its grid cell
const CELL_GAP: f64 = 20.0;
/// Size of windows opened without an explicit size
pub const DEFAULT_WINDOW_SIZE: (f64, f64) = (1280.0, 800.0);

#[derive(Debug, Clone)]
struct SimWindow {
    id: WindowId,
    workspace: usize,
    width: f64,
    height: f64,
}

/// Serializable view of the simulation
#[derive(Debug, Clone, Serialize)]
pub struct OverviewState {
    pub visible: bool,
    pub active_workspace: usize,
    pub workspace_count: usize,
    pub focus: Option<WindowId>,
    pub highlighted: Option<WindowId>,
    pub zoom: Option<Rect>,
    pub focus_hints: Vec<WindowId>,
    pub windows: Vec<WindowState>,
    pub subscriptions: usize,
    pub timeouts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowState {
    pub id: WindowId,
    pub workspace: usize,
    /// Thumbnail rectangle, only for windows of the active workspace
    pub thumbnail: Option<Rect>,
}

/// Simulated shell with one monitor
#[derive(Debug)]
pub struct SimulatedOverview {
    workspaces: usize,
    active_workspace: usize,
    windows: Vec<SimWindow>,
    next_window: u64,
    focus: Option<WindowId>,
    pointer: Point,
    highlight: Option<(WindowId, Rect)>,
    focus_hints: BTreeSet<WindowId>,
    windows_page: bool,
    visible: bool,
    subscriptions: BTreeMap<SubscriptionId, HostSignal>,
    timeouts: BTreeMap<TimeoutId, Duration>,
    pending: VecDeque<Event>,
    next_handle: u64,
}

impl Default for SimulatedOverview {
    fn default() -> Self {
        Self::new(4)
    }
}

impl SimulatedOverview {
    /// Create a shell with `workspaces` empty workspaces (at least one)
    pub fn new(workspaces: usize) -> Self {
        Self {
            workspaces: workspaces.max(1),
            active_workspace: 0,
            windows: Vec::new(),
            next_window: 1,
            focus: None,
            pointer: Point::new(MONITOR_WIDTH / 2.0, MONITOR_HEIGHT / 2.0),
            highlight: None,
            focus_hints: BTreeSet::new(),
            windows_page: true,
            visible: false,
            subscriptions: BTreeMap::new(),
            timeouts: BTreeMap::new(),
            pending: VecDeque::new(),
            next_handle: 0,
        }
    }

    /// Work area of the monitor, panel excluded
    pub fn work_area() -> Rect {
        Rect::new(
            0.0,
            PANEL_HEIGHT,
            MONITOR_WIDTH,
            MONITOR_HEIGHT - PANEL_HEIGHT,
        )
    }

    /// Open a window of the default size; it takes focus
    pub fn open_window(&mut self, workspace: usize) -> WindowId {
        let (width, height) = DEFAULT_WINDOW_SIZE;
        self.open_window_sized(workspace, width, height)
    }

    /// Open a window with an explicit real size; it takes focus
    pub fn open_window_sized(&mut self, workspace: usize, width: f64, height: f64) -> WindowId {
        let id = WindowId::from_raw(self.next_window).unwrap_or_else(WindowId::next);
        self.next_window += 1;
        let workspace = workspace.min(self.workspaces - 1);
        self.windows.push(SimWindow {
            id,
            workspace,
            width: width.max(1.0),
            height: height.max(1.0),
        });
        self.focus = Some(id);
        debug!("Opened {id} on workspace {workspace}");
        if self.visible {
            self.emit(HostEvent::WindowEnteredMonitor);
            if workspace == self.active_workspace {
                self.emit_reposition();
            }
        }
        id
    }

    /// Show the overview; every thumbnail reports ready
    pub fn open_overview(&mut self) {
        self.visible = true;
        self.windows_page = true;
        for _ in 0..self.active_windows().count() {
            self.emit(HostEvent::WindowReady);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Switch between the windows page and another overview page
    pub fn set_windows_page(&mut self, active: bool) {
        self.windows_page = active;
    }

    pub fn set_focus(&mut self, window: Option<WindowId>) {
        self.focus = window;
    }

    pub fn set_pointer(&mut self, position: Point) {
        self.pointer = position;
    }

    /// Start or end a thumbnail drag
    pub fn drag(&mut self, begin: bool) {
        let event = if begin {
            HostEvent::DragBegin
        } else {
            HostEvent::DragEnd
        };
        self.emit(event);
    }

    /// Let time pass; due timeouts fire in id order
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimeoutId> {
        let mut fired = Vec::new();
        for (id, remaining) in self.timeouts.iter_mut() {
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                fired.push(*id);
            }
        }
        for id in &fired {
            self.timeouts.remove(id);
            self.emit(HostEvent::TimeoutElapsed(*id));
        }
        fired
    }

    /// Queue an event for delivery if somebody listens to its signal
    pub fn emit(&mut self, event: impl Into<Event>) {
        let event = event.into();
        let signal = match &event {
            Event::Host(host_event) => host_event.signal(),
            Event::Input(input_event) => Some(input_event.signal()),
        };
        let connected = signal.map_or(true, |signal| {
            self.subscriptions.values().any(|connected| *connected == signal)
        });
        if connected {
            self.pending.push_back(event);
        } else {
            trace!("Nobody listens to {event:?}");
        }
    }

    /// Drain queued events in emission order
    pub fn take_events(&mut self) -> Vec<Event> {
        self.pending.drain(..).collect()
    }

    pub fn highlighted(&self) -> Option<WindowId> {
        self.highlight.map(|(window, _)| window)
    }

    pub fn focus_hints(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.focus_hints.iter().copied()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.len()
    }

    /// Windows of a workspace in stacking order
    pub fn windows_on(&self, workspace: usize) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|window| window.workspace == workspace)
            .map(|window| window.id)
            .collect()
    }

    /// Thumbnails of the active workspace laid out in a grid
    pub fn layout(&self) -> Vec<(WindowId, LiveGeometry)> {
        let windows: Vec<&SimWindow> = self.active_windows().collect();
        if windows.is_empty() {
            return Vec::new();
        }
        let area = Self::work_area().inset(GRID_MARGIN);
        let columns = (windows.len() as f64).sqrt().ceil() as usize;
        let rows = windows.len().div_ceil(columns);
        let cell_width = area.width / columns as f64;
        let cell_height = area.height / rows as f64;

        windows
            .iter()
            .enumerate()
            .map(|(index, window)| {
                let cell = Rect::new(
                    area.x + (index % columns) as f64 * cell_width,
                    area.y + (index / columns) as f64 * cell_height,
                    cell_width,
                    cell_height,
                )
                .inset(CELL_GAP);
                let scale = (cell.width / window.width)
                    .min(cell.height / window.height)
                    .min(1.0);
                let rect = Rect::centered(
                    cell.center(),
                    window.width * scale,
                    window.height * scale,
                );
                (window.id, LiveGeometry::new(rect, scale))
            })
            .collect()
    }

    /// Render the active workspace
    pub fn render(&self, renderer: &mut AsciiRenderer) -> String {
        let windows: Vec<AsciiWindow> = self
            .layout()
            .into_iter()
            .map(|(id, geometry)| match self.highlight {
                Some((highlighted, zoom)) if highlighted == id => AsciiWindow {
                    id,
                    bounds: zoom,
                    style: BoxStyle::Highlight,
                },
                _ => AsciiWindow {
                    id,
                    bounds: geometry.rect,
                    style: if self.focus_hints.contains(&id) {
                        BoxStyle::Focus
                    } else {
                        BoxStyle::Normal
                    },
                },
            })
            .collect();
        let header = format!(
            "Workspace {}/{}  windows: {}{}",
            self.active_workspace + 1,
            self.workspaces,
            windows.len(),
            if self.visible { "" } else { "  (overview hidden)" }
        );
        renderer.render(&header, &windows)
    }

    /// Serializable view of the simulation
    pub fn state(&self) -> OverviewState {
        let layout = self.layout();
        OverviewState {
            visible: self.visible,
            active_workspace: self.active_workspace,
            workspace_count: self.workspaces,
            focus: self.focus,
            highlighted: self.highlighted(),
            zoom: self.highlight.map(|(_, zoom)| zoom),
            focus_hints: self.focus_hints().collect(),
            windows: self
                .windows
                .iter()
                .map(|window| WindowState {
                    id: window.id,
                    workspace: window.workspace,
                    thumbnail: layout
                        .iter()
                        .find(|(id, _)| *id == window.id)
                        .map(|(_, geometry)| geometry.rect),
                })
                .collect(),
            subscriptions: self.subscriptions.len(),
            timeouts: self.timeouts.len(),
        }
    }

    fn active_windows(&self) -> impl Iterator<Item = &SimWindow> + '_ {
        let active = self.active_workspace;
        self.windows
            .iter()
            .filter(move |window| window.workspace == active)
    }

    fn find(&self, window: WindowId) -> NavResult<usize> {
        self.windows
            .iter()
            .position(|candidate| candidate.id == window)
            .ok_or(NavError::StaleReference(window))
    }

    /// Thumbnails of the active workspace move to new slots
    fn emit_reposition(&mut self) {
        if self.active_windows().next().is_some() {
            self.emit(HostEvent::WindowPositioningInit);
            self.emit(HostEvent::WindowPositioningStarted);
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl HostAdapter for SimulatedOverview {
    fn list_selectable_windows(&self) -> Vec<WindowId> {
        self.windows_on(self.active_workspace)
    }

    fn current_focus_window(&self) -> Option<WindowId> {
        self.focus
    }

    fn live_geometry(&self, window: WindowId) -> Option<LiveGeometry> {
        self.layout()
            .into_iter()
            .find(|(id, _)| *id == window)
            .map(|(_, geometry)| geometry)
    }

    fn monitor_work_area(&self, window: WindowId) -> Option<Rect> {
        self.find(window).ok().map(|_| Self::work_area())
    }

    fn windows_page_active(&self) -> bool {
        self.windows_page
    }

    fn pointer_position(&self) -> Point {
        self.pointer
    }

    fn highlight(&mut self, window: WindowId, zoom: Rect) -> NavResult<()> {
        self.find(window)?;
        self.highlight = Some((window, zoom));
        Ok(())
    }

    fn unhighlight(&mut self, window: WindowId, reset_geometry: bool) -> NavResult<()> {
        if self.highlighted() == Some(window) {
            self.highlight = None;
        }
        self.find(window)?;
        trace!("Unhighlighted {window}, reset geometry: {reset_geometry}");
        Ok(())
    }

    fn set_focus_hint(&mut self, window: WindowId, focused: bool) {
        if focused {
            self.focus_hints.insert(window);
        } else {
            self.focus_hints.remove(&window);
        }
    }

    fn close_window(&mut self, window: WindowId) -> NavResult<()> {
        let index = self.find(window)?;
        let closed = self.windows.remove(index);
        if self.focus == Some(window) {
            self.focus = None;
        }
        self.focus_hints.remove(&window);
        debug!("Closed {window}");
        self.emit(HostEvent::WindowLeftMonitor);
        if closed.workspace == self.active_workspace {
            self.emit_reposition();
        }
        Ok(())
    }

    fn activate_window(&mut self, window: WindowId) -> NavResult<()> {
        let index = self.find(window)?;
        self.active_workspace = self.windows[index].workspace;
        self.focus = Some(window);
        self.emit(HostEvent::OverviewHiding);
        self.visible = false;
        self.highlight = None;
        debug!("Activated {window}");
        Ok(())
    }

    fn move_window_to_workspace(&mut self, window: WindowId, workspace: usize) -> NavResult<()> {
        if workspace >= self.workspaces {
            return Err(NavError::InvalidState("target workspace does not exist"));
        }
        let index = self.find(window)?;
        let previous = self.windows[index].workspace;
        self.windows[index].workspace = workspace;
        debug!("Moved {window} from workspace {previous} to {workspace}");
        if previous == self.active_workspace {
            self.emit_reposition();
        }
        Ok(())
    }

    fn workspace_count(&self) -> usize {
        self.workspaces
    }

    fn active_workspace_index(&self) -> usize {
        self.active_workspace
    }

    fn activate_workspace(&mut self, index: usize) {
        if index >= self.workspaces || index == self.active_workspace {
            return;
        }
        self.active_workspace = index;
        self.highlight = None;
        self.emit(HostEvent::WorkspaceSwitched);
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

/// Shared handle to a [`SimulatedOverview`]
///
/// A controller lives only while the overview is shown, the simulated shell
/// outlives it. The handle lets both hold on to the same shell.
#[derive(Debug, Clone, Default)]
pub struct OverviewHandle(Rc<RefCell<SimulatedOverview>>);

impl OverviewHandle {
    pub fn new(overview: SimulatedOverview) -> Self {
        Self(Rc::new(RefCell::new(overview)))
    }

    pub fn borrow(&self) -> Ref<'_, SimulatedOverview> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, SimulatedOverview> {
        self.0.borrow_mut()
    }
}

impl HostAdapter for OverviewHandle {
    fn list_selectable_windows(&self) -> Vec<WindowId> {
        self.borrow().list_selectable_windows()
    }

    fn current_focus_window(&self) -> Option<WindowId> {
        self.borrow().current_focus_window()
    }

    fn live_geometry(&self, window: WindowId) -> Option<LiveGeometry> {
        self.borrow().live_geometry(window)
    }

    fn monitor_work_area(&self, window: WindowId) -> Option<Rect> {
        self.borrow().monitor_work_area(window)
    }

    fn windows_page_active(&self) -> bool {
        self.borrow().windows_page_active()
    }

    fn pointer_position(&self) -> Point {
        self.borrow().pointer_position()
    }

    fn highlight(&mut self, window: WindowId, zoom: Rect) -> NavResult<()> {
        self.borrow_mut().highlight(window, zoom)
    }

    fn unhighlight(&mut self, window: WindowId, reset_geometry: bool) -> NavResult<()> {
        self.borrow_mut().unhighlight(window, reset_geometry)
    }

    fn set_focus_hint(&mut self, window: WindowId, focused: bool) {
        self.borrow_mut().set_focus_hint(window, focused)
    }

    fn close_window(&mut self, window: WindowId) -> NavResult<()> {
        self.borrow_mut().close_window(window)
    }

    fn activate_window(&mut self, window: WindowId) -> NavResult<()> {
        self.borrow_mut().activate_window(window)
    }

    fn move_window_to_workspace(&mut self, window: WindowId, workspace: usize) -> NavResult<()> {
        self.borrow_mut().move_window_to_workspace(window, workspace)
    }

    fn workspace_count(&self) -> usize {
        self.borrow().workspace_count()
    }

    fn active_workspace_index(&self) -> usize {
        self.borrow().active_workspace_index()
    }

    fn activate_workspace(&mut self, index: usize) {
        self.borrow_mut().activate_workspace(index)
    }

    fn subscribe(&mut self, signal: HostSignal) -> SubscriptionId {
        self.borrow_mut().subscribe(signal)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.borrow_mut().unsubscribe(id)
    }

    fn add_timeout(&mut self, delay: Duration) -> TimeoutId {
        self.borrow_mut().add_timeout(delay)
    }

    fn remove_timeout(&mut self, id: TimeoutId) {
        self.borrow_mut().remove_timeout(id)
    }
}
