//! Contains the reporter CLI.

use crate::{flags::ReporterArgs, workload};
use anyhow::{Context, Result};
use clap::Parser;
use influx_reporter_cli::{LogArgs, LogConfig, MetricsArgs, cli_styles};
use influx_reporter_registry::MetricRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Reports the metrics of a synthetic workload to InfluxDB.
#[derive(Parser, Debug)]
#[command(name = "influx-reporter", about = "Reports in-process metrics to InfluxDB", styles = cli_styles())]
pub struct Cli {
    /// Global args
    #[command(flatten)]
    pub global: LogArgs,

    /// Prometheus metrics args
    #[command(flatten)]
    pub metrics: MetricsArgs,

    /// Reporter args
    #[command(flatten)]
    pub reporter: ReporterArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        Self::init_logs(&self.global)?;

        Self::run_until_ctrl_c(async move {
            Self::init_metrics(&self.metrics)?;

            let registry = Arc::new(MetricRegistry::new());
            let cancel = CancellationToken::new();

            let workload = workload::spawn(Arc::clone(&registry), cancel.clone())?;
            let reporter =
                influx_reporter_core::spawn(registry, self.reporter.config(), cancel.clone())
                    .context("failed to start the InfluxDB reporter")?;

            tokio::signal::ctrl_c().await.context("failed to listen for Ctrl+C")?;
            info!(target: "reporter", "Ctrl+C received, shutting down...");

            cancel.cancel();
            workload.await.context("workload task failed")?;
            reporter.await.context("reporter task failed")?;
            info!(target: "reporter", "Reporter shut down gracefully.");
            Ok(())
        })
    }

    /// Run until ctrl-c is pressed.
    pub fn run_until_ctrl_c<F>(fut: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime().map_err(|e| anyhow::anyhow!(e))?;
        rt.block_on(fut)
    }

    /// Creates a new default tokio multi-thread [`Runtime`](tokio::runtime::Runtime) with all
    /// features enabled
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }

    /// Installs the Prometheus recorder and describes the reporter's own metrics.
    pub fn init_metrics(args: &MetricsArgs) -> Result<()> {
        args.init_metrics().context("failed to start the Prometheus exporter")?;
        if args.enabled {
            influx_reporter_core::Metrics::init();
        }
        Ok(())
    }

    /// Initializes the tracing subscriber.
    pub fn init_logs(args: &LogArgs) -> Result<()> {
        let filter = tracing_subscriber::EnvFilter::from_default_env();
        LogConfig::new(args.clone()).init_tracing_subscriber(Some(filter))?;
        Ok(())
    }
}
