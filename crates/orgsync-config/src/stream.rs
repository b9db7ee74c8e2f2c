//! Push-stream configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    "/api/organizations/sse".to_string()
}

/// Default first reconnect delay in milliseconds.
const fn default_initial_backoff_ms() -> u64 {
    500
}

/// Default reconnect delay ceiling in milliseconds.
const fn default_max_backoff_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StreamConfig {
    /// Event-stream endpoint path, appended to `api.base_url`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Reconnect with exponential backoff (and re-run the bulk load) after a
    /// transport error. Off by default: the subscriber disconnects and stays
    /// disconnected.
    #[serde(default)]
    pub reconnect: bool,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            reconnect: false,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl StreamConfig {
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::invalid(
                "stream.path",
                format!("must start with '/', got '{}'", self.path),
            ));
        }
        if self.initial_backoff_ms == 0 {
            return Err(ConfigError::invalid(
                "stream.initial_backoff_ms",
                "must be greater than 0",
            ));
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ConfigError::invalid(
                "stream.max_backoff_ms",
                format!(
                    "must be at least initial_backoff_ms ({})",
                    self.initial_backoff_ms
                ),
            ));
        }
        Ok(())
    }
}
