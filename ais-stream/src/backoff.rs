use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

pub const TERMINAL_FAILURE_MESSAGE: &str =
    "Connection failed after multiple attempts. Check your API key or try again later.";

/// Exponential reconnect schedule, `base_delay * 2^(attempt - 1)` for at most `max_retries`
/// consecutive failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

/// Tracks consecutive failures against a [ReconnectPolicy].
pub struct Backoff {
    policy: ReconnectPolicy,
    delays: ExponentialBackoff,
    attempt: u32,
}

/// A scheduled reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    pub attempt: u32,
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl ReconnectPolicy {
    fn delays(&self) -> ExponentialBackoff {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(2.0)
            .with_max_times(self.max_retries as usize)
            .build()
    }
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            delays: policy.delays(),
            attempt: 0,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.delays = self.policy.delays();
        self.attempt = 0;
    }

    /// Returns `None` once the retry budget is exhausted.
    pub fn next_retry(&mut self) -> Option<Retry> {
        let delay = self.delays.next()?;
        self.attempt += 1;
        Some(Retry {
            attempt: self.attempt,
            delay,
        })
    }

    pub fn retry_message(&self, retry: &Retry) -> String {
        format!(
            "Connection lost. Reconnecting in {}s... (attempt {}/{})",
            (retry.delay.as_millis() as f64 / 1000.0).round(),
            retry.attempt,
            self.policy.max_retries,
        )
    }
}
