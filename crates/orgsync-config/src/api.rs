//! REST backend configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_user_agent() -> String {
    concat!("orgsync/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend origin; endpoint paths (`/api/organizations/...`) are appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout for REST calls, in seconds. Unset means no
    /// client-side timeout. Never applied to the event stream.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Join an absolute endpoint path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.origin();
        if origin.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                format!("expected an http(s) URL, got '{origin}'"),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "api.request_timeout_secs",
                "must be greater than 0 when set",
            ));
        }
        Ok(())
    }
}
