use std::time::Duration;

use tokio::time::timeout;

use crate::StopSignal;

/// Default timeout for waits performed in tests.
///
/// Releases are expected to propagate in well under a second, so this only fires when the
/// signal is never triggered.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// A wrapper around [`StopSignal`] whose waits panic after a timeout.
///
/// This prevents tests from hanging indefinitely when the signal is never triggered, making them
/// fail with a clear message instead.
#[derive(Debug, Clone)]
pub struct TimedSignal {
    signal: StopSignal,
    timeout_duration: Duration,
}

impl TimedSignal {
    /// Creates a new [`TimedSignal`] with the default timeout.
    pub fn new(signal: StopSignal) -> Self {
        Self::with_timeout(signal, DEFAULT_WAIT_TIMEOUT)
    }

    /// Creates a new [`TimedSignal`] with a custom timeout duration.
    pub fn with_timeout(signal: StopSignal, timeout_duration: Duration) -> Self {
        Self {
            signal,
            timeout_duration,
        }
    }

    /// Waits for the signal with timeout.
    ///
    /// # Panics
    ///
    /// Panics if the timeout elapses before the signal is triggered.
    pub async fn stopped(&self) {
        if timeout(self.timeout_duration, self.signal.wait())
            .await
            .is_err()
        {
            panic!(
                "Stop signal `{}` was not triggered within {:?}.",
                self.signal.name(),
                self.timeout_duration
            );
        }
    }

    /// Asserts that a wait on the signal is still pending after `duration`.
    ///
    /// # Panics
    ///
    /// Panics if the signal releases its waiters within `duration`.
    pub async fn assert_pending_for(&self, duration: Duration) {
        if timeout(duration, self.signal.wait()).await.is_ok() {
            panic!(
                "Stop signal `{}` released its waiters before {:?} elapsed.",
                self.signal.name(),
                duration
            );
        }
    }

    /// Returns the underlying [`StopSignal`].
    pub fn inner(&self) -> &StopSignal {
        &self.signal
    }
}
