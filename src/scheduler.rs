//! Deferred refresh after thumbnail reposition animations
//!
//! Geometry is not safe to read while the host animates thumbnails into
//! new slots. The controller therefore asks the host for a one-shot timeout
//! covering the animation and refreshes when it fires. Only the most
//! recently scheduled timeout is honored: scheduling again cancels the
//! previous one, and a late [`crate::event::HostEvent::TimeoutElapsed`]
//! carrying an older id is ignored.

use std::time::Duration;

use tracing::{debug, trace};

use crate::host::{HostAdapter, TimeoutId};

/// Token-guarded one-shot timeout
#[derive(Debug, Default)]
pub struct DeferredRefresh {
    pending: Option<TimeoutId>,
}

impl DeferredRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the refresh, superseding any pending one
    pub fn schedule<H: HostAdapter + ?Sized>(&mut self, host: &mut H, delay: Duration) -> TimeoutId {
        if let Some(previous) = self.pending.take() {
            trace!("Superseding {previous}");
            host.remove_timeout(previous);
        }
        let id = host.add_timeout(delay);
        debug!("Scheduled deferred refresh {id} in {delay:?}");
        self.pending = Some(id);
        id
    }

    /// Cancel the pending refresh; returns whether one was pending
    pub fn cancel<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.pending.take() {
            Some(id) => {
                host.remove_timeout(id);
                true
            }
            None => false,
        }
    }

    /// Consume a fired timeout; true only for the current token
    pub fn fire(&mut self, id: TimeoutId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            trace!("Ignoring stale {id}");
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
