//! Reporter configuration.

use crate::ReporterError;
use influx_reporter_client::{ClientConfig, DEFAULT_TIMEOUT, Url};
use std::time::Duration;

/// Interval between two health checks of the database connection.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// [`ReporterConfig`] holds everything needed to start a [`Reporter`](crate::Reporter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// How often the registry is written to the database.
    pub interval: Duration,
    /// Base URL of the InfluxDB server.
    pub endpoint: String,
    /// Database the points are written to.
    pub database: String,
    /// Username for basic auth. Empty disables authentication.
    pub username: String,
    /// Password for basic auth.
    pub password: String,
    /// Prefix every measurement with the local hostname.
    pub tag_host: bool,
    /// Upper bound on a single ping or write request.
    pub request_timeout: Duration,
}

impl ReporterConfig {
    /// Creates a configuration using the default request timeout.
    pub fn new(
        interval: Duration,
        endpoint: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        tag_host: bool,
    ) -> Self {
        Self {
            interval,
            endpoint: endpoint.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            tag_host,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Checks the configuration and derives the client settings from it.
    pub fn client_config(&self) -> Result<ClientConfig, ReporterError> {
        if self.interval.is_zero() {
            return Err(ReporterError::ZeroInterval);
        }
        let url = Url::parse(&self.endpoint).map_err(|source| ReporterError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        Ok(ClientConfig::new(url, self.username.clone(), self.password.clone())
            .with_timeout(self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(interval: Duration, endpoint: &str) -> ReporterConfig {
        ReporterConfig::new(interval, endpoint, "metrics", "admin", "secret", false)
    }

    #[test]
    fn test_client_config_carries_credentials() {
        let client = config(Duration::from_secs(1), "http://localhost:8086")
            .with_request_timeout(Duration::from_secs(3))
            .client_config()
            .unwrap();

        assert_eq!(client.url.as_str(), "http://localhost:8086/");
        assert_eq!(client.username, "admin");
        assert_eq!(client.password, "secret");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = config(Duration::ZERO, "http://localhost:8086").client_config().unwrap_err();
        assert!(matches!(err, ReporterError::ZeroInterval));
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("http://[::1")]
    fn test_malformed_endpoint_is_rejected(#[case] endpoint: &str) {
        let err = config(Duration::from_secs(1), endpoint).client_config().unwrap_err();
        assert!(matches!(err, ReporterError::InvalidEndpoint { .. }));
    }
}
