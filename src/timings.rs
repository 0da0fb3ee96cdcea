//! Timing configuration for the sync engine.

use std::time::Duration;

/// Timing knobs for one [`SyncClient`](crate::SyncClient).
///
/// # Examples
///
/// ```rust
/// use realty_sync::SyncTimings;
/// use std::time::Duration;
///
/// // Defaults (1s debounce window)
/// let timings = SyncTimings::default();
///
/// // Custom window
/// let timings = SyncTimings::builder()
///     .debounce_window(Duration::from_millis(500))
///     .build();
///
/// // Short windows for tests
/// let timings = SyncTimings::fast();
/// ```
#[derive(Debug, Clone)]
pub struct SyncTimings {
    /// Quiescence window for the trailing-edge refetch debounce.
    /// Default: 1000 ms.
    pub debounce_window: Duration,

    /// Maximum time to wait for a change-feed subscription to open.
    /// Zero disables the timeout. Default: 10 seconds.
    pub feed_open_timeout: Duration,
}

impl Default for SyncTimings {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(1000),
            feed_open_timeout: Duration::from_secs(10),
        }
    }
}

impl SyncTimings {
    /// Create a builder for custom timings.
    pub fn builder() -> SyncTimingsBuilder {
        SyncTimingsBuilder::new()
    }

    /// Short windows suitable for tests and local development.
    pub fn fast() -> Self {
        Self {
            debounce_window: Duration::from_millis(50),
            feed_open_timeout: Duration::from_secs(2),
        }
    }

    /// Check if a duration means "no timeout".
    pub fn is_no_timeout(duration: Duration) -> bool {
        duration.is_zero()
    }
}

/// Builder for [`SyncTimings`].
#[derive(Debug, Clone)]
pub struct SyncTimingsBuilder {
    timings: SyncTimings,
}

impl SyncTimingsBuilder {
    fn new() -> Self {
        Self {
            timings: SyncTimings::default(),
        }
    }

    /// Set the debounce quiescence window.
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.timings.debounce_window = window;
        self
    }

    /// Set the feed-open timeout. Zero disables it.
    pub fn feed_open_timeout(mut self, timeout: Duration) -> Self {
        self.timings.feed_open_timeout = timeout;
        self
    }

    /// Build the timing configuration.
    pub fn build(self) -> SyncTimings {
        self.timings
    }
}
