use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// Lifecycle of the live stream client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Subscribed,
    Closed,
    Failed,
}

/// Externally visible status of the active feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub state: ConnectionState,
    pub processed_messages: u64,
    /// Human readable retry countdown or terminal failure text.
    pub error: Option<String>,
}

/// Write side of the [FeedStatus] observable.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    sender: Arc<watch::Sender<FeedStatus>>,
}

impl FeedStatus {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Subscribed
    }
}

impl StatusReporter {
    pub fn new(sender: Arc<watch::Sender<FeedStatus>>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, watch::Receiver<FeedStatus>) {
        let (sender, receiver) = watch::channel(FeedStatus::default());
        (Self::new(Arc::new(sender)), receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedStatus> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> FeedStatus {
        self.sender.borrow().clone()
    }

    pub fn reset(&self) {
        self.sender.send_replace(FeedStatus::default());
    }

    pub fn set_state(&self, state: ConnectionState) {
        self.sender.send_if_modified(|s| {
            let changed = s.state != state;
            s.state = state;
            changed
        });
    }

    /// Marks the subscription as established, which also clears any surfaced error.
    pub fn subscribed(&self) {
        self.sender.send_modify(|s| {
            s.state = ConnectionState::Subscribed;
            s.error = None;
        });
    }

    pub fn set_error(&self, state: ConnectionState, error: Option<String>) {
        self.sender.send_modify(|s| {
            s.state = state;
            s.error = error;
        });
    }

    pub fn set_processed(&self, processed_messages: u64) {
        self.sender.send_if_modified(|s| {
            let changed = s.processed_messages != processed_messages;
            s.processed_messages = processed_messages;
            changed
        });
    }
}
