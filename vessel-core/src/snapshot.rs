use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use crate::{Mmsi, Vessel, VesselFragment};

pub type VesselMap = HashMap<Mmsi, Vessel>;

/// Read side of the published vessel map, every value is a complete snapshot.
pub type SnapshotReceiver = watch::Receiver<Arc<VesselMap>>;

/// Owns the published vessel map. Published maps are never mutated, each publish
/// replaces the visible map with a new one.
#[derive(Debug)]
pub struct SnapshotPublisher {
    sender: Arc<watch::Sender<Arc<VesselMap>>>,
    current: Arc<VesselMap>,
}

pub fn snapshot_channel() -> (Arc<watch::Sender<Arc<VesselMap>>>, SnapshotReceiver) {
    let (sender, receiver) = watch::channel(Arc::new(VesselMap::new()));
    (Arc::new(sender), receiver)
}

impl SnapshotPublisher {
    /// Takes over the given channel and publishes an empty map to it.
    pub fn new(sender: Arc<watch::Sender<Arc<VesselMap>>>) -> Self {
        let current = Arc::new(VesselMap::new());
        sender.send_replace(current.clone());
        Self { sender, current }
    }

    pub fn current(&self) -> &VesselMap {
        &self.current
    }

    /// Folds the drained fragments into the previously published map and publishes the
    /// result. Records that still have no position after the fold are withheld.
    /// Returns the number of vessels that were inserted or updated.
    pub fn fold(&mut self, fragments: HashMap<Mmsi, VesselFragment>, now: DateTime<Utc>) -> usize {
        if fragments.is_empty() {
            return 0;
        }

        let mut next = (*self.current).clone();
        let mut updated = 0;

        for (mmsi, fragment) in fragments {
            let vessel = Vessel::fold(mmsi, fragment, next.get(&mmsi), now);
            if vessel.has_fix() {
                next.insert(mmsi, vessel);
                updated += 1;
            }
        }

        debug!(updated, vessels = next.len(), "published vessel snapshot");
        self.publish(next);
        updated
    }

    /// Replaces the published map wholesale.
    pub fn publish(&mut self, vessels: VesselMap) {
        self.current = Arc::new(vessels);
        self.sender.send_replace(self.current.clone());
    }
}
