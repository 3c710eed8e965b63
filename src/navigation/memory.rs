//! Reversibility cache for directional moves
//!
//! Without it, moving right and then left could land on a different window
//! than the origin whenever another window is closer on the way back. Each
//! resolved move is stored together with its reciprocal so the reverse key
//! always returns to where the user came from. Entries are indices into the
//! refresh order and must be dropped whenever that order changes.

use std::collections::HashMap;

use super::Direction;

/// Memoized directional graph of one selection session
#[derive(Debug, Clone)]
pub struct NavigationMemory {
    enabled: bool,
    edges: HashMap<(usize, Direction), usize>,
}

impl Default for NavigationMemory {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NavigationMemory {
    /// Create an empty memory; a disabled memory never hits and never records
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            edges: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a previously resolved move
    pub fn lookup(&self, from: usize, direction: Direction) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        self.edges.get(&(from, direction)).copied()
    }

    /// Record a resolved move and, unless it is a self-loop, its reverse
    pub fn record(&mut self, from: usize, direction: Direction, to: usize) {
        if !self.enabled {
            return;
        }
        self.edges.insert((from, direction), to);
        if to != from {
            self.edges.insert((to, direction.opposite()), from);
        }
    }

    /// Forget every recorded move
    pub fn invalidate(&mut self) {
        self.edges.clear();
    }

    /// Number of stored edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
