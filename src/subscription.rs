//! Ledger of host signal connections
//!
//! Connections are grouped by how long they live so that a whole group can
//! be dropped at once: the init group when the overview finished opening,
//! the transient group when the active workspace changes, the selection
//! group when a keyboard selection ends. [`SubscriptionLedger::disconnect_all`]
//! releases everything that is still connected.

use std::collections::HashMap;

use tracing::debug;

use crate::host::{HostAdapter, HostSignal, SubscriptionId};

/// Lifetime class of a signal connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionGroup {
    /// Lives as long as the controller
    Permanent,
    /// Lives until every thumbnail finished the opening animation
    Init,
    /// Bound to the currently active workspace
    Transient,
    /// Lives while a keyboard selection is in progress
    Selection,
}

/// Connections the controller made through the host, by group
#[derive(Debug, Default)]
pub struct SubscriptionLedger {
    groups: HashMap<SubscriptionGroup, Vec<(HostSignal, SubscriptionId)>>,
}

impl SubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to every signal in `signals` and file the ids under `group`
    pub fn connect<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        group: SubscriptionGroup,
        signals: &[HostSignal],
    ) {
        let entries = self.groups.entry(group).or_default();
        for &signal in signals {
            let id = host.subscribe(signal);
            entries.push((signal, id));
        }
        debug!("Connected {} signal(s) in group {:?}", signals.len(), group);
    }

    /// Disconnect one group, returning how many connections were released
    pub fn disconnect_group<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        group: SubscriptionGroup,
    ) -> usize {
        let Some(entries) = self.groups.remove(&group) else {
            return 0;
        };
        for (_, id) in &entries {
            host.unsubscribe(*id);
        }
        debug!("Disconnected {} signal(s) in group {:?}", entries.len(), group);
        entries.len()
    }

    /// Disconnect every group
    pub fn disconnect_all<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> usize {
        let groups: Vec<SubscriptionGroup> = self.groups.keys().copied().collect();
        groups
            .into_iter()
            .map(|group| self.disconnect_group(host, group))
            .sum()
    }

    /// Whether any connection of `group` is live
    pub fn is_connected(&self, group: SubscriptionGroup) -> bool {
        self.groups
            .get(&group)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Whether some group listens to `signal`
    pub fn listens_to(&self, signal: HostSignal) -> bool {
        self.groups
            .values()
            .flatten()
            .any(|(connected, _)| *connected == signal)
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::StubHost;

    #[test]
    fn groups_disconnect_independently() {
        let mut host = StubHost::default();
        let mut ledger = SubscriptionLedger::new();
        ledger.connect(
            &mut host,
            SubscriptionGroup::Permanent,
            &[HostSignal::KeyPress, HostSignal::DragBegin],
        );
        ledger.connect(
            &mut host,
            SubscriptionGroup::Selection,
            &[HostSignal::ButtonPress, HostSignal::PointerMotion],
        );
        assert_eq!(host.subscriptions.len(), 4);
        assert!(ledger.listens_to(HostSignal::PointerMotion));

        assert_eq!(ledger.disconnect_group(&mut host, SubscriptionGroup::Selection), 2);
        assert!(!ledger.is_connected(SubscriptionGroup::Selection));
        assert!(!ledger.listens_to(HostSignal::PointerMotion));
        assert_eq!(host.subscriptions.len(), 2);
        assert_eq!(ledger.disconnect_group(&mut host, SubscriptionGroup::Selection), 0);
    }

    #[test]
    fn disconnect_all_leaves_nothing_behind() {
        let mut host = StubHost::default();
        let mut ledger = SubscriptionLedger::new();
        ledger.connect(&mut host, SubscriptionGroup::Permanent, &[HostSignal::KeyPress]);
        ledger.connect(&mut host, SubscriptionGroup::Init, &[HostSignal::WindowReady]);
        ledger.connect(
            &mut host,
            SubscriptionGroup::Transient,
            &[HostSignal::WindowPositioningInit],
        );

        assert_eq!(ledger.disconnect_all(&mut host), 3);
        assert!(ledger.is_empty());
        assert!(host.subscriptions.is_empty());
    }
}
