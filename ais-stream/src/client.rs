use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::Deserialize;
use snafu::ResultExt;
use tokio::{
    sync::watch,
    time::{Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use vessel_core::{ConnectionState, SnapshotPublisher, StatusReporter, VesselMap};

use crate::{
    backoff::{
        Backoff, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, ReconnectPolicy,
        TERMINAL_FAILURE_MESSAGE,
    },
    error::{Error, Result, error::JsonSnafu},
    models::{ApiKey, SubscriptionRequest, parse_message},
    reconciler::FragmentBuffer,
    transport::{Connection, Transport, TransportEvent},
};

pub const AISSTREAM_URL: &str = "wss://stream.aisstream.io/v0/stream";
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    pub url: String,
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
}

/// Owns the connection to the live feed and the fragment buffer. Runs until the feed is
/// closed normally, the retry budget is exhausted or the cancellation token fires.
pub struct StreamClient<T: Transport> {
    transport: T,
    api_key: ApiKey,
    backoff: Backoff,
    flush_interval: Duration,
    buffer: FragmentBuffer,
    publisher: SnapshotPublisher,
    status: StatusReporter,
}

enum StreamEnd {
    Cancelled,
    Closed { normal: bool },
    Failed(Error),
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            url: AISSTREAM_URL.to_string(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl StreamSettings {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
        }
    }
}

impl<T: Transport> StreamClient<T> {
    /// Takes over the snapshot channel, the published map starts out empty.
    pub fn new(
        transport: T,
        api_key: ApiKey,
        snapshots: Arc<watch::Sender<Arc<VesselMap>>>,
        status: StatusReporter,
    ) -> Self {
        Self {
            transport,
            api_key,
            backoff: Backoff::new(ReconnectPolicy::default()),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            buffer: FragmentBuffer::new(),
            publisher: SnapshotPublisher::new(snapshots),
            status,
        }
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.backoff = Backoff::new(policy);
        self
    }

    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    #[instrument(skip_all)]
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.flush_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            self.status.set_state(ConnectionState::Connecting);
            info!("connecting to ais stream");

            let connected = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = self.transport.connect() => result,
            };

            let mut connection = match connected {
                Ok(c) => c,
                Err(e) => {
                    warn!("failed to connect to ais stream: {e:?}");
                    if self.wait_for_retry(&cancel).await {
                        continue;
                    }
                    return;
                }
            };

            let subscribed = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    connection.close().await;
                    return;
                }
                result = self.subscribe(&mut connection) => result,
            };

            let end = match subscribed {
                Ok(()) => {
                    self.status.subscribed();
                    self.backoff.reset();
                    info!("subscribed to ais stream");
                    self.stream(&mut connection, &mut interval, &cancel).await
                }
                Err(e) => StreamEnd::Failed(e),
            };

            match end {
                StreamEnd::Cancelled => {
                    connection.close().await;
                    return;
                }
                StreamEnd::Closed { normal: true } => {
                    self.flush();
                    self.status.set_error(ConnectionState::Closed, None);
                    info!("ais stream closed normally");
                    return;
                }
                StreamEnd::Closed { normal: false } => {
                    self.flush();
                    warn!("ais stream closed unexpectedly");
                }
                StreamEnd::Failed(e) => {
                    self.flush();
                    warn!("ais stream failed: {e:?}");
                }
            }

            if !self.wait_for_retry(&cancel).await {
                return;
            }
        }
    }

    async fn subscribe(&self, connection: &mut T::Connection) -> Result<()> {
        let request = SubscriptionRequest::global(self.api_key.clone());
        let text = serde_json::to_string(&request).context(JsonSnafu)?;
        connection.send_text(text).await
    }

    async fn stream(
        &mut self,
        connection: &mut T::Connection,
        interval: &mut Interval,
        cancel: &CancellationToken,
    ) -> StreamEnd {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                _ = interval.tick() => self.flush(),
                event = connection.recv() => match event {
                    TransportEvent::Message(text) => self.handle_message(&text),
                    TransportEvent::Closed { normal } => return StreamEnd::Closed { normal },
                    TransportEvent::Failed(e) => return StreamEnd::Failed(e),
                },
            }
        }
    }

    fn handle_message(&mut self, text: &str) {
        match parse_message(text) {
            Ok(message) => {
                self.buffer
                    .apply(&message, self.publisher.current(), Utc::now());
            }
            Err(e) => debug!("dropped ais message: {e:?}"),
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let fragments = self.buffer.take();
        self.publisher.fold(fragments, Utc::now());
        self.status.set_processed(self.buffer.processed());
    }

    /// Sleeps until the next attempt. Returns false if retries are exhausted or the
    /// client was cancelled while waiting.
    async fn wait_for_retry(&mut self, cancel: &CancellationToken) -> bool {
        let Some(retry) = self.backoff.next_retry() else {
            error!(
                attempts = self.backoff.attempt(),
                "giving up on ais stream after repeated failures"
            );
            self.status.set_error(
                ConnectionState::Failed,
                Some(TERMINAL_FAILURE_MESSAGE.to_string()),
            );
            return false;
        };

        warn!(
            attempt = retry.attempt,
            delay_ms = retry.delay.as_millis() as u64,
            "scheduling reconnect"
        );
        self.status.set_error(
            ConnectionState::Closed,
            Some(self.backoff.retry_message(&retry)),
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(retry.delay) => true,
        }
    }
}
