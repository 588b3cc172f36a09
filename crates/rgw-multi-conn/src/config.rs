//! Connection options

use std::time::Duration;

/// Settings applied to every client a gateway hands out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Request timeout (HTTP client timeout, REST operation timeout)
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Retries after the first attempt made by REST clients
    pub max_retries: u32,
    /// Region legacy connections sign requests for
    pub signing_region: String,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("rgw-multi-conn/{}", env!("CARGO_PKG_VERSION")),
            max_retries: 3,
            signing_region: "us-east-1".to_string(),
        }
    }
}

impl ConnectionOptions {
    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of retries REST clients make after a failed attempt
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the region legacy connections sign for
    pub fn with_signing_region(mut self, region: impl Into<String>) -> Self {
        self.signing_region = region.into();
        self
    }

    /// Total attempts per REST operation: the first try plus retries
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
