//! Per-request deadline enforcement.
//!
//! # Responsibilities
//! - Arm a deadline when a request is admitted
//! - Race the deadline against the backend call
//! - Cancel the backend call when the deadline fires first
//! - Disarm the timer when the backend responds first
//!
//! # Design Decisions
//! - Built on tokio timers and `select!`; no shared timer wheel state
//! - Exactly one outcome per request: `Completed` or `TimedOut`, both
//!   terminal
//! - Dropping the losing branch is the cancellation mechanism: a timed-out
//!   backend future is dropped, which aborts the in-flight hyper call and
//!   releases the outbound connection; a completed request drops the sleep,
//!   so the timer can never fire late and attempt a second response

use std::future::Future;
use std::time::Duration;

/// Terminal states of a watched request.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The backend call finished before the deadline; the timer was
    /// disarmed.
    Completed(T),
    /// The deadline fired first; the backend call was cancelled.
    TimedOut,
}

impl<T> Outcome<T> {
    /// True when the deadline fired.
    pub fn timed_out(&self) -> bool {
        matches!(self, Outcome::TimedOut)
    }
}

/// A one-shot deadline tied to a single request's lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineGuard {
    duration: Duration,
}

impl DeadlineGuard {
    /// Arm a deadline for the given duration.
    pub fn arm(duration: Duration) -> Self {
        Self { duration }
    }

    /// Race `fut` against the deadline, consuming the guard.
    ///
    /// Biased toward completion so a backend response that is already
    /// ready wins over a deadline expiring on the same poll.
    pub async fn watch<F>(self, fut: F) -> Outcome<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            out = fut => Outcome::Completed(out),
            _ = tokio::time::sleep(self.duration) => Outcome::TimedOut,
        }
    }
}
