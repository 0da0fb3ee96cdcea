//! Trailing-edge debounce for refetch scheduling.
//!
//! Change events arrive in bursts (a bulk update touches many rows); each
//! accepted event re-arms a single deadline and the orchestrator's select
//! loop fires one refetch once the quiescence window has elapsed with no new
//! events.  Liveness is the orchestrator task itself: when it shuts down the
//! deadline can no longer fire, so nothing mutates state after unmount.

use std::time::Duration;

use tokio::time::Instant;

/// A deadline far enough in the future (~100 years) to act as "never" for
/// `sleep_until` without overflowing `Instant::now() + dur`.
pub(crate) const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// One trailing-edge debounce deadline.
///
/// At most one pending trailing call exists; `arm()` while armed resets the
/// timer rather than queueing a second call.
#[derive(Debug)]
pub(crate) struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the deadline at `now + window`.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True when a trailing call is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant `sleep_until` should wake at; far future when unarmed.
    ///
    /// Callers guard the select arm with [`is_armed`](Self::is_armed), so
    /// the far-future value is only a placeholder for a disabled branch.
    pub fn deadline(&self) -> Instant {
        self.deadline
            .unwrap_or_else(|| Instant::now() + FAR_FUTURE)
    }
}
