//! Type-safe window identity
//!
//! Windows in the overview are owned by the host. The controller only keeps
//! copies of their ids, which are:
//! - non-zero (so `Option<WindowId>` costs nothing extra)
//! - unique for the lifetime of the process when minted with [`WindowId::next`]
//! - impossible to mix up with list indices

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique identifier for a window thumbnail in the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WindowId(NonZeroU64);

/// Starts at 1 so every minted value is non-zero
static WINDOW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl WindowId {
    /// Mint a fresh id, used by hosts that have no native window handle
    pub fn next() -> Self {
        let id = WINDOW_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        WindowId(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    /// Wrap a host-native handle
    ///
    /// Returns None if the value is zero
    pub fn from_raw(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(WindowId)
    }

    /// Get the raw ID value
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Window({})", self.0)
    }
}
