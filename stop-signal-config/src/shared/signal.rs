use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Configuration for a stop signal shared by a group of workers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StopSignalConfig {
    /// Name used to label log events and metrics emitted by the signal.
    #[serde(default = "default_name")]
    pub name: String,
    /// Maximum time, in milliseconds, a bounded wait on the signal lasts before giving up.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl StopSignalConfig {
    /// Default signal name.
    pub const DEFAULT_NAME: &'static str = "stop";

    /// Default bounded wait timeout in milliseconds.
    pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

    /// Validates the signal configuration.
    ///
    /// Ensures the name is not blank and the wait timeout is non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "stop_signal.name".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.wait_timeout_ms == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "stop_signal.wait_timeout_ms".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the bounded wait timeout as a [`Duration`].
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

impl Default for StopSignalConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

fn default_name() -> String {
    StopSignalConfig::DEFAULT_NAME.to_string()
}

fn default_wait_timeout_ms() -> u64 {
    StopSignalConfig::DEFAULT_WAIT_TIMEOUT_MS
}
