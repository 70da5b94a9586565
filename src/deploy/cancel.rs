// ABOUTME: Caller-owned cancellation signal with an optional deadline.
// ABOUTME: The pipeline only observes it; firing is up to the caller.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a deployment was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Cancelled explicitly (Ctrl-C or `cancel()`).
    Interrupted,
    /// The deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Interrupted => f.write_str("interrupted"),
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Cancellation and deadline signal for one deploy invocation.
///
/// Clones share state: cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
    reason: Arc<Mutex<Option<CancelReason>>>,
}

impl CancelSignal {
    /// A signal that only fires when `cancel()` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that also fires once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::default()
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire the signal. The first recorded reason wins.
    pub fn cancel(&self) {
        self.reason.lock().get_or_insert(CancelReason::Interrupted);
        self.token.cancel();
    }

    /// Whether the signal has fired, by explicit cancel or by deadline.
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        if let Some(reason) = *self.reason.lock() {
            return Some(reason);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve once the signal fires.
    pub async fn cancelled(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => self.recorded_reason(),
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                self.recorded_reason()
            }
        }
    }

    fn recorded_reason(&self) -> CancelReason {
        self.reason.lock().unwrap_or(CancelReason::Interrupted)
    }
}
