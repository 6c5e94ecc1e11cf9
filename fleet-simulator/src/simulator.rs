use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use tokio::{sync::watch, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use vessel_core::{SnapshotPublisher, VesselMap};

use crate::{generate::generate_fleet, kinematics::advance};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Fixed seed for a reproducible fleet.
    pub seed: Option<u64>,
}

/// Owns the published map while the simulated feed is active.
pub struct Simulator {
    publisher: SnapshotPublisher,
    rng: StdRng,
    tick_interval: Duration,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

impl Simulator {
    /// Takes over the snapshot channel and publishes a freshly generated fleet.
    pub fn new(snapshots: Arc<watch::Sender<Arc<VesselMap>>>, settings: &SimulationSettings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut publisher = SnapshotPublisher::new(snapshots);
        let fleet = generate_fleet(&mut rng, Utc::now());
        info!(vessels = fleet.len(), "generated simulated fleet");
        publisher.publish(fleet);

        Self {
            publisher,
            rng,
            tick_interval: settings.tick_interval,
        }
    }

    pub fn fleet(&self) -> &VesselMap {
        self.publisher.current()
    }

    /// Moves every vessel one tick forward and publishes the result.
    pub fn step(&mut self) {
        let dt = self.tick_interval.as_secs_f64();
        let now = Utc::now();

        let mut next = self.publisher.current().clone();
        for vessel in next.values_mut() {
            advance(vessel, dt, &mut self.rng, now);
        }

        debug!(vessels = next.len(), "advanced simulated fleet");
        self.publisher.publish(next);
    }

    #[instrument(skip_all)]
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The fleet was published on construction.
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("simulation stopped");
                    return;
                }
                _ = interval.tick() => self.step(),
            }
        }
    }
}
