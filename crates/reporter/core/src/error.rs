//! Reporter error types.

use influx_reporter_client::ClientError;
use thiserror::Error;

/// Configuration errors that prevent the reporter from starting.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The emission interval is zero.
    #[error("emission interval must be greater than zero")]
    ZeroInterval,

    /// The endpoint is not a valid URL.
    #[error("unable to parse InfluxDB url {endpoint}: {source}")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
        /// Why it was rejected.
        #[source]
        source: url::ParseError,
    },

    /// The initial client could not be built.
    #[error("unable to make InfluxDB client: {0}")]
    Client(#[from] ClientError),
}

/// Errors that abort a single emission.
#[derive(Debug, Error)]
pub enum EmissionError {
    /// Host tagging is enabled and the hostname could not be resolved.
    #[error(transparent)]
    Hostname(#[from] HostnameError),

    /// The last client rebuild failed and no client is available.
    #[error("no InfluxDB client available, waiting for reconnect")]
    NoClient,

    /// The write request failed.
    #[error(transparent)]
    Write(#[from] ClientError),
}

/// Errors resolving the local hostname.
#[derive(Debug, Error)]
pub enum HostnameError {
    /// The operating system call failed.
    #[error("unable to resolve hostname: {0}")]
    Io(#[from] std::io::Error),

    /// The hostname is not valid UTF-8.
    #[error("hostname is not valid utf-8")]
    InvalidUtf8,

    /// The resolved hostname is empty.
    #[error("hostname is empty")]
    Empty,

    /// Hostname resolution is not available on this platform.
    #[error("hostname resolution is not supported on this platform")]
    Unsupported,
}
