// ABOUTME: Polls remote image optimization until it reaches a terminal state.
// ABOUTME: Fixed interval between checks; every wait races the cancel signal.

use std::time::Duration;
use tracing::{debug, warn};

use super::cancel::CancelSignal;
use super::error::DeployError;
use crate::config::default_poll_interval;
use crate::platform::{OptimizationStatus, PlatformError, PlatformOps};
use crate::types::AppName;

/// Why optimization did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum OptimizationError {
    /// The platform reported the job as failed.
    #[error("the platform reported a failed optimization")]
    Failed,

    /// A status check could not be completed.
    #[error("status check failed: {0}")]
    Status(#[from] PlatformError),
}

/// Poll loop state.
#[derive(Debug)]
pub enum PollState {
    /// Optimization still running; wait and check again.
    Pending,
    /// Optimization finished.
    Terminal(Result<(), OptimizationError>),
}

impl PollState {
    /// The state that follows observing `status`.
    ///
    /// Any status other than `in_progress` ends polling. Unrecognised values
    /// count as success.
    pub fn after(status: &OptimizationStatus) -> Self {
        match status {
            OptimizationStatus::InProgress => PollState::Pending,
            OptimizationStatus::Done => PollState::Terminal(Ok(())),
            OptimizationStatus::Failed => PollState::Terminal(Err(OptimizationError::Failed)),
            OptimizationStatus::Other(value) => {
                warn!(status = %value, "unrecognised optimization status, treating as done");
                PollState::Terminal(Ok(()))
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Terminal(_))
    }
}

/// Drives a remote optimization job to completion.
pub struct Optimizer<'a, P: ?Sized> {
    platform: &'a P,
    interval: Duration,
}

impl<'a, P: PlatformOps + ?Sized> Optimizer<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self {
            platform,
            interval: default_poll_interval(),
        }
    }

    /// Override the wait between status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll until optimization of `image` finishes.
    ///
    /// The first check is immediate. Status errors are fatal and never retried.
    /// Cancellation is observed during each check and each wait; it does not
    /// ask the platform to stop the job.
    pub async fn run(
        &self,
        app: &AppName,
        image: &str,
        cancel: &CancelSignal,
    ) -> Result<(), DeployError> {
        let mut checks = 0u32;

        loop {
            let status = tokio::select! {
                biased;
                reason = cancel.cancelled() => return Err(DeployError::Cancelled(reason)),
                status = self.platform.optimization_status(app, image) => status,
            };
            checks += 1;

            let status = status.map_err(OptimizationError::from)?;
            debug!(app = %app, checks, status = %status, "optimization check");

            match PollState::after(&status) {
                PollState::Terminal(result) => return result.map_err(DeployError::from),
                PollState::Pending => {}
            }

            tokio::select! {
                biased;
                reason = cancel.cancelled() => return Err(DeployError::Cancelled(reason)),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
