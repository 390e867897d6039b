//! Errors returned by the InfluxDB client.

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Errors raised while building or using an [`InfluxClient`](crate::InfluxClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint is neither `http` nor `https`.
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    /// The endpoint cannot have path segments appended to it.
    #[error("url cannot be used as a base: {0}")]
    CannotBeABase(Url),

    /// Transport level failure: connection refused, timeout, TLS, ...
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("influxdb responded with {status}: {body}")]
    Status {
        /// The response status.
        status: StatusCode,
        /// The response body, trimmed.
        body: String,
    },
}
