//! Prometheus metrics flags.

use clap::Args;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration of the Prometheus endpoint serving the reporter's own metrics.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve metrics over HTTP for Prometheus to scrape.
    #[arg(long = "metrics.enabled", env = "METRICS_ENABLED")]
    pub enabled: bool,

    /// Address the metrics endpoint listens on.
    #[arg(
        long = "metrics.addr",
        env = "METRICS_ADDR",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub addr: IpAddr,

    /// Port the metrics endpoint listens on.
    #[arg(long = "metrics.port", env = "METRICS_PORT", default_value_t = 9090)]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Returns the socket address of the metrics endpoint.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    /// Installs the Prometheus recorder and its HTTP listener as the global recorder.
    ///
    /// Does nothing when metrics are disabled.
    pub fn init_metrics(&self) -> Result<(), BuildError> {
        if self.enabled {
            PrometheusBuilder::new().with_http_listener(self.socket_addr()).install()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct MockCommand {
        #[clap(flatten)]
        metrics: MetricsArgs,
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let args = MockCommand::parse_from(["test"]);
        assert_eq!(args.metrics, MetricsArgs::default());
        assert_eq!(args.metrics.socket_addr(), "0.0.0.0:9090".parse().unwrap());
    }

    #[test]
    fn test_metrics_flags() {
        let args = MockCommand::parse_from([
            "test",
            "--metrics.enabled",
            "--metrics.addr",
            "127.0.0.1",
            "--metrics.port",
            "1234",
        ]);
        assert!(args.metrics.enabled);
        assert_eq!(args.metrics.socket_addr(), "127.0.0.1:1234".parse().unwrap());
    }

    #[test]
    fn test_disabled_metrics_install_nothing() {
        MetricsArgs::default().init_metrics().unwrap();
    }
}
