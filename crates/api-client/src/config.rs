//! Configuration for the favorites API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use favmap_core::config::ApiConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default local server origin
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin; endpoint paths are appended to it
    pub base_url: String,
    /// Session cookie for endpoints that need a login (`JSESSIONID=...`)
    pub session_cookie: Option<String>,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `FAVMAP_API_URL`: Server origin
    /// - `FAVMAP_SESSION`: Session cookie for save/delete/check
    /// - `FAVMAP_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::default().merge_env()
    }

    /// Create configuration from the `[api]` section of a config file,
    /// with environment variables taking precedence
    pub fn from_schema(api: &ApiConfig) -> ApiResult<Self> {
        Self {
            base_url: api.base_url.clone(),
            session_cookie: api.session_cookie.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
        }
        .merge_env()
    }

    fn merge_env(mut self) -> ApiResult<Self> {
        if let Ok(url) = env::var("FAVMAP_API_URL") {
            self.base_url = url;
        }

        if let Ok(cookie) = env::var("FAVMAP_SESSION") {
            self.session_cookie = Some(cookie);
        }

        if let Ok(raw) = env::var("FAVMAP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ApiError::config(format!("FAVMAP_TIMEOUT_SECS is not a number: {raw}")))?;
            self.timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the session cookie
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
