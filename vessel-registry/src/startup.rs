use std::time::Duration;

use ais_stream::{
    models::ApiKey,
    transport::{Transport, WebSocketTransport},
};
use tokio::{sync::watch, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use vessel_core::{FeedStatus, SnapshotReceiver};

use crate::{controller::FeedController, settings::Settings, summary::FleetSummary};

pub struct App<T: Transport + Clone> {
    controller: FeedController<T>,
    api_key: Option<ApiKey>,
    status_interval: Duration,
}

impl App<WebSocketTransport> {
    pub fn build(settings: &Settings) -> App<WebSocketTransport> {
        App::with_transport(settings, WebSocketTransport::new(settings.stream.url.clone()))
    }
}

impl<T: Transport + Clone> App<T> {
    pub fn with_transport(settings: &Settings, transport: T) -> App<T> {
        App {
            controller: FeedController::new(
                transport,
                settings.stream.clone(),
                settings.simulation.clone(),
            ),
            api_key: settings.api_key.clone(),
            status_interval: settings.status_interval,
        }
    }

    pub fn snapshots(&self) -> SnapshotReceiver {
        self.controller.snapshots()
    }

    pub fn status(&self) -> watch::Receiver<FeedStatus> {
        self.controller.status()
    }

    /// Starts live mode when a credential is configured and the simulation otherwise,
    /// then logs a summary of the published map until `shutdown` fires.
    #[instrument(skip_all)]
    pub async fn run(mut self, shutdown: CancellationToken) {
        if !self.controller.start_live(self.api_key.clone()).await {
            info!("no api key configured, running the fleet simulation");
            self.controller.start_simulation().await;
        }

        let snapshots = self.controller.snapshots();
        let status = self.controller.status();

        let mut interval = tokio::time::interval(self.status_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let summary = FleetSummary::new(&snapshots.borrow());
                    let status = status.borrow().clone();
                    info!(
                        mode = ?self.controller.mode(),
                        vessels = summary.vessels,
                        moving = summary.moving,
                        categories = %summary,
                        state = %status.state,
                        processed = status.processed_messages,
                        error = status.error.as_deref(),
                        "registry status"
                    );
                }
            }
        }

        info!("shutting down");
        self.controller.stop().await;
    }
}
