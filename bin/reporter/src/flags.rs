//! Reporter flags.

use clap::Args;
use influx_reporter_core::ReporterConfig;
use std::time::Duration;

/// InfluxDB connection and reporting arguments.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReporterArgs {
    /// Base URL of the InfluxDB server.
    #[arg(long = "influx.url", env = "INFLUX_URL", default_value = "http://localhost:8086")]
    pub url: String,

    /// Database the metrics are written to.
    #[arg(long = "influx.database", env = "INFLUX_DATABASE", default_value = "metrics")]
    pub database: String,

    /// Username for basic auth. Leave empty to disable authentication.
    #[arg(long = "influx.username", env = "INFLUX_USERNAME", default_value = "")]
    pub username: String,

    /// Password for basic auth.
    #[arg(
        long = "influx.password",
        env = "INFLUX_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Timeout of a single ping or write request, in seconds.
    #[arg(long = "influx.timeout", env = "INFLUX_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Seconds between two emissions.
    #[arg(long = "report.interval", env = "REPORT_INTERVAL", default_value_t = 10)]
    pub interval: u64,

    /// Prefix every measurement with the local hostname.
    #[arg(long = "report.tag-host", env = "REPORT_TAG_HOST", default_value_t = false)]
    pub tag_host: bool,
}

impl ReporterArgs {
    /// Builds the [`ReporterConfig`]. Validation happens when the reporter starts.
    pub fn config(&self) -> ReporterConfig {
        ReporterConfig::new(
            Duration::from_secs(self.interval),
            self.url.clone(),
            self.database.clone(),
            self.username.clone(),
            self.password.clone(),
            self.tag_host,
        )
        .with_request_timeout(Duration::from_secs(self.timeout))
    }
}
