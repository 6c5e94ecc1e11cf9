use std::{future::Future, sync::Arc};

use ais_stream::{
    client::{StreamClient, StreamSettings},
    models::ApiKey,
    transport::Transport,
};
use fleet_simulator::{SimulationSettings, Simulator};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vessel_core::{FeedStatus, SnapshotReceiver, StatusReporter, VesselMap, snapshot_channel};

/// Source currently publishing into the vessel map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FeedMode {
    Live,
    Simulation,
}

struct ActiveFeed {
    mode: FeedMode,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs at most one feed at a time. Starting a feed stops the previous one first, so
/// only one task ever publishes into the shared snapshot channel.
pub struct FeedController<T: Transport + Clone> {
    transport: T,
    stream: StreamSettings,
    simulation: SimulationSettings,
    snapshots: Arc<watch::Sender<Arc<VesselMap>>>,
    status: StatusReporter,
    active: Option<ActiveFeed>,
}

impl<T: Transport + Clone> FeedController<T> {
    pub fn new(transport: T, stream: StreamSettings, simulation: SimulationSettings) -> Self {
        let (snapshots, _) = snapshot_channel();
        let (status, _) = StatusReporter::channel();

        Self {
            transport,
            stream,
            simulation,
            snapshots,
            status,
            active: None,
        }
    }

    pub fn snapshots(&self) -> SnapshotReceiver {
        self.snapshots.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<FeedStatus> {
        self.status.subscribe()
    }

    pub fn mode(&self) -> Option<FeedMode> {
        self.active.as_ref().map(|feed| feed.mode)
    }

    /// Returns `false` without touching the running feed when no credential is given.
    pub async fn start_live(&mut self, api_key: Option<ApiKey>) -> bool {
        let Some(api_key) = api_key else {
            warn!("live mode requested without an api key");
            return false;
        };

        self.stop().await;

        let client = StreamClient::new(
            self.transport.clone(),
            api_key,
            self.snapshots.clone(),
            self.status.clone(),
        )
        .with_policy(self.stream.reconnect_policy())
        .with_flush_interval(self.stream.flush_interval);

        self.spawn(FeedMode::Live, |cancel| client.run(cancel));
        true
    }

    pub async fn start_simulation(&mut self) {
        self.stop().await;

        let simulator = Simulator::new(self.snapshots.clone(), &self.simulation);
        self.spawn(FeedMode::Simulation, |cancel| simulator.run(cancel));
    }

    /// Cancels the active feed and waits for it to release its timers and connection.
    pub async fn stop(&mut self) {
        if let Some(feed) = self.active.take() {
            feed.cancel.cancel();
            if let Err(e) = feed.handle.await {
                error!(mode = %feed.mode, "feed task failed: {e:?}");
            }
            info!(mode = %feed.mode, "feed stopped");
        }
        self.status.reset();
    }

    fn spawn<F, Fut>(&mut self, mode: FeedMode, run: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(cancel.clone()));
        info!(%mode, "feed started");

        self.active = Some(ActiveFeed {
            mode,
            cancel,
            handle,
        });
    }
}
