//! One selection session: the windows and geometry captured by a refresh

use tracing::trace;

use crate::error::NavResult;
use crate::geometry::{GeometrySnapshot, SnapshotStore};
use crate::navigation::{find_neighbor, Direction, NavigationMemory};
use crate::window::WindowId;

/// Windows, snapshots and cursor of the current overview state
///
/// Indices are positions in the refresh order and are only meaningful for
/// the session that produced them.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    store: SnapshotStore,
    memory: NavigationMemory,
    initial_index: usize,
    current_index: usize,
}

impl SelectionSession {
    /// Capture a session from already refreshed snapshots
    ///
    /// The cursor starts on `focus` if it is part of the store, otherwise on
    /// the last window.
    pub fn new(store: SnapshotStore, focus: Option<WindowId>, memory_enabled: bool) -> Self {
        let initial_index = focus
            .and_then(|window| store.position(window))
            .unwrap_or_else(|| store.len().saturating_sub(1));
        Self {
            store,
            memory: NavigationMemory::new(memory_enabled),
            initial_index,
            current_index: initial_index,
        }
    }

    /// Find where a move in `direction` leads, memory first
    pub fn resolve(&self, direction: Direction) -> NavResult<Option<usize>> {
        if let Some(index) = self.memory.lookup(self.current_index, direction) {
            trace!("Memory hit {} {direction} -> {index}", self.current_index);
            return Ok(Some(index));
        }
        find_neighbor(&self.store, self.current_index, direction)
    }

    /// Move the cursor and remember the edge in both directions
    pub fn move_to(&mut self, direction: Direction, to: usize) {
        self.memory.record(self.current_index, direction, to);
        self.current_index = to;
    }

    /// Put the cursor back where the session started
    pub fn rewind(&mut self) {
        self.current_index = self.initial_index;
    }

    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn initial_window(&self) -> Option<WindowId> {
        self.store.window(self.initial_index).ok()
    }

    pub fn current_window(&self) -> Option<WindowId> {
        self.store.window(self.current_index).ok()
    }

    pub fn window(&self, index: usize) -> NavResult<WindowId> {
        self.store.window(index)
    }

    pub fn snapshot(&self, index: usize) -> NavResult<&GeometrySnapshot> {
        self.store.get(index)
    }

    pub fn memory(&self) -> &NavigationMemory {
        &self.memory
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
