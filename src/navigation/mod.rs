//! Directional search over geometry snapshots
//!
//! A window qualifies as a neighbor in a direction only when it lies
//! entirely beyond the selected window's edge in that direction (strict
//! half-plane, no overlap tolerance). Among the qualifying windows the one
//! whose center is closest by Manhattan distance wins; on a tie the first
//! one in refresh order is kept.

pub mod memory;

pub use memory::NavigationMemory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::geometry::{GeometrySnapshot, SnapshotStore};

/// Direction of an arrow-key move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(NavError::Config(format!("Unknown direction: {s}"))),
        }
    }
}

/// Manhattan distance between the centers of two snapshots
pub fn distance(a: &GeometrySnapshot, b: &GeometrySnapshot) -> f64 {
    (a.center_x - b.center_x).abs() + (a.center_y - b.center_y).abs()
}

/// Check whether `candidate` lies strictly beyond `selected` in `direction`
pub fn is_candidate(
    direction: Direction,
    selected: &GeometrySnapshot,
    candidate: &GeometrySnapshot,
) -> bool {
    match direction {
        Direction::Up => candidate.y + candidate.height < selected.y,
        Direction::Down => candidate.y > selected.y + selected.height,
        Direction::Left => candidate.x + candidate.width < selected.x,
        Direction::Right => candidate.x > selected.x + selected.width,
    }
}

/// Find the closest window from `from` in `direction` by a full scan
///
/// Returns `Ok(None)` when nothing qualifies, which callers treat as a
/// boundary no-op rather than an error.
#[profiling::function]
pub fn find_neighbor(
    store: &SnapshotStore,
    from: usize,
    direction: Direction,
) -> NavResult<Option<usize>> {
    let selected = store.get(from)?;
    let mut best = None;
    let mut best_distance = f64::INFINITY;

    for (index, candidate) in store.snapshots().enumerate() {
        if !is_candidate(direction, selected, candidate) {
            continue;
        }
        let d = distance(selected, candidate);
        if d < best_distance {
            best_distance = d;
            best = Some(index);
        }
    }

    Ok(best)
}
