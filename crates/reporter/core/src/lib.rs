#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
pub use config::{HEALTH_CHECK_INTERVAL, ReporterConfig};

mod error;
pub use error::{EmissionError, HostnameError, ReporterError};

mod hostname;
pub use hostname::{HostnameResolver, StaticHostname, SystemHostname};

mod metrics;
pub use metrics::Metrics;

pub mod translate;
pub use translate::{translate, translate_metric};

mod supervisor;
pub use supervisor::{
    ClientFactory, ConnectionState, ConnectionSupervisor, HealthCheck, HttpClientFactory,
};

mod reporter;
pub use reporter::{Reporter, spawn, start};

#[cfg(test)]
mod test_utils;
