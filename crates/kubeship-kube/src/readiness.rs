//! Waiting for the API server to come up
//!
//! The poller checks a [`ReadinessProbe`] until it reports ready, sleeping a
//! fixed interval between attempts. There is no deadline: the loop only ends
//! on success or when its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::RestClient;
use crate::error::{KubeError, Result};

/// Default delay between readiness checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Something that can say whether the API server is usable
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn is_ready(&self) -> bool;
}

#[async_trait]
impl ReadinessProbe for RestClient {
    async fn is_ready(&self) -> bool {
        self.api_valid().await
    }
}

/// Delay between attempts, injectable for tests
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a probe until it reports ready
#[derive(Clone)]
pub struct ReadinessPoller {
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
    cancel: Option<CancellationToken>,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl std::fmt::Debug for ReadinessPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessPoller")
            .field("interval", &self.interval)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

impl ReadinessPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            sleeper: Arc::new(TokioSleeper),
            cancel: None,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Stop polling when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check until ready, returning the number of checks performed
    ///
    /// Each failed check logs at info and sleeps once before the next
    /// attempt, so a probe that succeeds on check `n` costs `n - 1` sleeps.
    pub async fn wait_until_ready<P>(&self, probe: &P) -> Result<u32>
    where
        P: ReadinessProbe + ?Sized,
    {
        let mut attempts: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Err(KubeError::Cancelled);
            }

            attempts += 1;
            if probe.is_ready().await {
                info!(attempts, "API server is ready");
                return Ok(attempts);
            }

            // The failed discovery call has already been logged at warn
            info!(
                "API server is not ready. Retrying in {}s",
                self.interval.as_secs_f64()
            );

            match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(KubeError::Cancelled),
                        _ = self.sleeper.sleep(self.interval) => {}
                    }
                }
                None => self.sleeper.sleep(self.interval).await,
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
