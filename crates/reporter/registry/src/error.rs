//! Errors returned when registering instruments.

use thiserror::Error;

/// Errors raised by [`MetricRegistry`](crate::MetricRegistry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An instrument is already registered under this name.
    #[error("metric already registered: {0}")]
    Duplicate(String),

    /// The name is taken by an instrument of a different kind.
    #[error("metric {name} is registered as a {found}, not a {expected}")]
    KindMismatch {
        /// The requested name.
        name: String,
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind already registered.
        found: &'static str,
    },
}
