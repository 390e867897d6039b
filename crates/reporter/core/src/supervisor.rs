//! Health checking and recovery of the database connection.

use crate::Metrics;
use auto_impl::auto_impl;
use influx_reporter_client::{ClientConfig, ClientError, HttpClient, InfluxClient};
use std::fmt::Debug;
use tracing::{debug, error, info, warn};

/// Builds database clients from a [`ClientConfig`].
#[auto_impl(&, Arc, Box)]
pub trait ClientFactory: Debug + Send + Sync {
    /// The client type produced.
    type Client: InfluxClient;

    /// Builds a fresh client. No request is made.
    fn connect(&self, config: &ClientConfig) -> Result<Self::Client, ClientError>;
}

/// [`ClientFactory`] producing [`HttpClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    type Client = HttpClient;

    fn connect(&self, config: &ClientConfig) -> Result<HttpClient, ClientError> {
        HttpClient::new(config.clone())
    }
}

/// Connection state tracked by the [`ConnectionSupervisor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A client is available.
    Connected,
    /// The last rebuild failed; no client is available until the next health check.
    Reconnecting,
}

/// Outcome of a single [`ConnectionSupervisor::health_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    /// The ping succeeded.
    Healthy,
    /// The ping failed or no client was available, and a new client was built.
    Reconnected,
    /// The ping failed or no client was available, and rebuilding the client failed.
    Unavailable,
}

/// Owns the current database client and replaces it when the database stops answering pings.
#[derive(Debug)]
pub struct ConnectionSupervisor<F: ClientFactory> {
    factory: F,
    config: ClientConfig,
    client: Option<F::Client>,
}

impl<F: ClientFactory> ConnectionSupervisor<F> {
    /// Builds the initial client.
    ///
    /// Fails if the first client cannot be built. Later rebuild failures are retried.
    pub fn connect(factory: F, config: ClientConfig) -> Result<Self, ClientError> {
        let client = factory.connect(&config)?;
        Ok(Self { factory, config, client: Some(client) })
    }

    /// Returns the current client, if any.
    pub const fn client(&self) -> Option<&F::Client> {
        self.client.as_ref()
    }

    /// Returns the configuration clients are built from.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current [`ConnectionState`].
    pub const fn state(&self) -> ConnectionState {
        if self.client.is_some() { ConnectionState::Connected } else { ConnectionState::Reconnecting }
    }

    /// Pings the database and rebuilds the client if the ping fails.
    ///
    /// Without a client the ping is skipped and a rebuild is attempted right away.
    pub async fn health_check(&mut self) -> HealthCheck {
        match &self.client {
            Some(client) => match client.ping().await {
                Ok(pong) => {
                    debug!(
                        target: "reporter::supervisor",
                        rtt = ?pong.rtt,
                        version = pong.version.as_deref().unwrap_or("unknown"),
                        "InfluxDB ping succeeded"
                    );
                    return HealthCheck::Healthy;
                }
                Err(err) => {
                    metrics::counter!(Metrics::PING_FAILURES).increment(1);
                    warn!(target: "reporter::supervisor", %err, "Got error while sending a ping to InfluxDB, trying to recreate client");
                }
            },
            None => {
                debug!(target: "reporter::supervisor", "No InfluxDB client, trying to recreate client");
            }
        }

        self.rebuild()
    }

    fn rebuild(&mut self) -> HealthCheck {
        self.client = None;
        match self.factory.connect(&self.config) {
            Ok(client) => {
                self.client = Some(client);
                metrics::counter!(Metrics::CLIENT_REBUILDS, "result" => "success").increment(1);
                info!(target: "reporter::supervisor", url = %self.config.url, "Recreated InfluxDB client");
                HealthCheck::Reconnected
            }
            Err(err) => {
                metrics::counter!(Metrics::CLIENT_REBUILDS, "result" => "error").increment(1);
                error!(target: "reporter::supervisor", %err, "Unable to make InfluxDB client");
                HealthCheck::Unavailable
            }
        }
    }
}
