//! Geometry snapshots of overview thumbnails
//!
//! Navigation never reads live geometry while a selection is in progress.
//! Instead, the rectangles of all selectable windows are captured once per
//! refresh into a [`SnapshotStore`], which stays immutable until the next
//! refresh so the directional graph cannot jitter mid-session.

pub mod zoom;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{NavError, NavResult};
use crate::window::WindowId;

/// A point in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point
    pub fn manhattan(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// An axis-aligned rectangle in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of the given size centered on a point
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink the rectangle by `padding` on every side
    pub fn inset(&self, padding: f64) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.width - 2.0 * padding).max(0.0),
            (self.height - 2.0 * padding).max(0.0),
        )
    }
}

/// Geometry of a thumbnail as currently rendered by the host
///
/// `rect` is the on-screen (already scaled) rectangle, `scale` the factor
/// the host applied to the real window to produce the thumbnail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveGeometry {
    pub rect: Rect,
    pub scale: f64,
}

impl LiveGeometry {
    pub fn new(rect: Rect, scale: f64) -> Self {
        Self { rect, scale }
    }
}

/// Immutable capture of one thumbnail's geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl GeometrySnapshot {
    /// Capture a snapshot from the host's live geometry
    pub fn capture(live: &LiveGeometry) -> Self {
        let center = live.rect.center();
        Self {
            x: live.rect.x,
            y: live.rect.y,
            width: live.rect.width,
            height: live.rect.height,
            center_x: center.x,
            center_y: center.y,
            scale: live.scale,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

impl From<Rect> for GeometrySnapshot {
    fn from(rect: Rect) -> Self {
        Self::capture(&LiveGeometry::new(rect, 1.0))
    }
}

/// Ordered snapshots of every selectable window of one refresh
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    entries: Vec<(WindowId, GeometrySnapshot)>,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all snapshots with the current geometry of `windows`
    ///
    /// Order is preserved. A window whose geometry the host can no longer
    /// report has vanished since it was listed and is left out.
    pub fn refresh<F>(&mut self, windows: &[WindowId], mut live: F)
    where
        F: FnMut(WindowId) -> Option<LiveGeometry>,
    {
        self.entries.clear();
        for &window in windows {
            match live(window) {
                Some(geometry) => self
                    .entries
                    .push((window, GeometrySnapshot::capture(&geometry))),
                None => warn!("{}", NavError::StaleReference(window)),
            }
        }
    }

    /// Get the snapshot at an index of the refreshed order
    pub fn get(&self, index: usize) -> NavResult<&GeometrySnapshot> {
        self.entries
            .get(index)
            .map(|(_, snapshot)| snapshot)
            .ok_or(NavError::NotFound(index))
    }

    /// Get the window at an index of the refreshed order
    pub fn window(&self, index: usize) -> NavResult<WindowId> {
        self.entries
            .get(index)
            .map(|(window, _)| *window)
            .ok_or(NavError::NotFound(index))
    }

    /// Find the index of a window
    pub fn position(&self, window: WindowId) -> Option<usize> {
        self.entries.iter().position(|(id, _)| *id == window)
    }

    /// Iterate over snapshots in refresh order
    pub fn snapshots(&self) -> impl Iterator<Item = &GeometrySnapshot> {
        self.entries.iter().map(|(_, snapshot)| snapshot)
    }

    /// Iterate over windows in refresh order
    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.entries.iter().map(|(window, _)| *window)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every snapshot
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> WindowId {
        WindowId::from_raw(raw).unwrap()
    }

    #[test]
    fn snapshot_derives_center_from_scaled_rect() {
        let live = LiveGeometry::new(Rect::new(10.0, 20.0, 100.0, 50.0), 0.5);
        let snapshot = GeometrySnapshot::capture(&live);
        assert_eq!(snapshot.center_x, 60.0);
        assert_eq!(snapshot.center_y, 45.0);
        assert_eq!(snapshot.scale, 0.5);
        assert_eq!(snapshot.rect(), live.rect);
    }

    #[test]
    fn store_lookup_before_refresh_is_not_found() {
        let store = SnapshotStore::new();
        assert!(matches!(store.get(0), Err(NavError::NotFound(0))));
        assert!(matches!(store.window(0), Err(NavError::NotFound(0))));
    }

    #[test]
    fn refresh_replaces_previous_snapshots() {
        let mut store = SnapshotStore::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        store.refresh(&[id(1), id(2), id(3)], |_| Some(LiveGeometry::new(rect, 1.0)));
        assert_eq!(store.len(), 3);

        store.refresh(&[id(4)], |_| Some(LiveGeometry::new(rect, 1.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.window(0).unwrap(), id(4));
        assert!(store.get(1).is_err());
    }

    #[test]
    fn refresh_skips_vanished_windows_and_keeps_order() {
        let mut store = SnapshotStore::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        store.refresh(&[id(1), id(2), id(3)], |window| {
            (window != id(2)).then(|| LiveGeometry::new(rect, 1.0))
        });
        assert_eq!(store.windows().collect::<Vec<_>>(), vec![id(1), id(3)]);
        assert_eq!(store.position(id(3)), Some(1));
        assert_eq!(store.position(id(2)), None);
    }

    #[test]
    fn inset_never_goes_negative() {
        let rect = Rect::new(0.0, 0.0, 40.0, 100.0);
        let inset = rect.inset(30.0);
        assert_eq!(inset.width, 0.0);
        assert_eq!(inset.height, 40.0);
    }
}
