//! Error types for the fallible helpers built around [`StopSignal`](crate::StopSignal).
//!
//! Constructing, triggering, waiting on and querying a signal cannot fail. Errors only arise
//! from bounded waits and from building a signal out of an invalid configuration.

use std::time::Duration;

use stop_signal_config::shared::ValidationError;
use thiserror::Error;

/// Convenient result type for stop signal operations using [`StopSignalError`].
pub type StopSignalResult<T> = Result<T, StopSignalError>;

/// Errors returned by stop signal helpers.
#[derive(Debug, Error)]
pub enum StopSignalError {
    /// The signal was not triggered within the allowed time.
    #[error("timed out after {timeout:?} waiting for stop signal `{name}`")]
    WaitTimedOut { name: String, timeout: Duration },

    /// The configuration used to build the signal is invalid.
    #[error("invalid stop signal configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}
