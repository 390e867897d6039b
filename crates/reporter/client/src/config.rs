//! Connection settings for the InfluxDB client.

use std::time::Duration;
use url::Url;

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`ClientConfig`] sets the endpoint and credentials of an [`HttpClient`].
///
/// [`HttpClient`]: crate::HttpClient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the InfluxDB server, e.g. `http://localhost:8086`.
    pub url: Url,
    /// Username for basic auth. Empty disables authentication.
    pub username: String,
    /// Password for basic auth.
    pub password: String,
    /// Upper bound on a single ping or write request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the [`DEFAULT_TIMEOUT`].
    pub fn new(url: Url, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { url, username: username.into(), password: password.into(), timeout: DEFAULT_TIMEOUT }
    }

    /// Overrides the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` when requests carry basic auth credentials.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("http://localhost:8086".parse().unwrap(), "", "");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_with_timeout_and_credentials() {
        let config = ClientConfig::new("http://localhost:8086".parse().unwrap(), "admin", "secret")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert!(config.has_credentials());
    }
}
