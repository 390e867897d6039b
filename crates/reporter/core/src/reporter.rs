//! The reporting loop.

use crate::{
    ClientFactory, ConnectionSupervisor, EmissionError, HEALTH_CHECK_INTERVAL, HostnameError,
    HostnameResolver, HttpClientFactory, Metrics, ReporterConfig, ReporterError, SystemHostname,
    translate,
};
use influx_reporter_client::{BatchPoints, InfluxClient, line};
use influx_reporter_registry::Registry;
use std::time::{Duration, SystemTime};
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

/// Deadline used in place of a first tick that lies beyond the clock's range.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Periodically writes a [`Registry`] to InfluxDB and keeps the connection healthy.
///
/// A single task owns the reporter. Emission and health checks never run concurrently.
#[derive(Debug)]
pub struct Reporter<R, F: ClientFactory, H> {
    registry: R,
    supervisor: ConnectionSupervisor<F>,
    hostname: H,
    database: String,
    interval: Duration,
    tag_host: bool,
}

impl<R: Registry> Reporter<R, HttpClientFactory, SystemHostname> {
    /// Creates a reporter writing over HTTP and tagging with the system hostname.
    pub fn new(registry: R, config: &ReporterConfig) -> Result<Self, ReporterError> {
        Self::with_parts(registry, config, HttpClientFactory, SystemHostname)
    }
}

impl<R, F, H> Reporter<R, F, H>
where
    R: Registry,
    F: ClientFactory,
    H: HostnameResolver,
{
    /// Creates a reporter from its parts.
    ///
    /// Validates `config` and builds the initial client. Any failure here is fatal.
    pub fn with_parts(
        registry: R,
        config: &ReporterConfig,
        factory: F,
        hostname: H,
    ) -> Result<Self, ReporterError> {
        let client_config = config.client_config()?;
        let supervisor = ConnectionSupervisor::connect(factory, client_config)?;

        Ok(Self {
            registry,
            supervisor,
            hostname,
            database: config.database.clone(),
            interval: config.interval,
            tag_host: config.tag_host,
        })
    }

    /// Returns the connection supervisor.
    pub const fn supervisor(&self) -> &ConnectionSupervisor<F> {
        &self.supervisor
    }

    /// Runs until `cancel` is cancelled.
    ///
    /// Both timers fire one full period after the loop starts. A slow handler delays the next
    /// tick instead of causing a burst of catch-up ticks.
    pub async fn run(mut self, cancel: CancellationToken) {
        let start = Instant::now();
        let mut emit = interval_at(first_tick(start, self.interval), self.interval);
        emit.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut health =
            interval_at(first_tick(start, HEALTH_CHECK_INTERVAL), HEALTH_CHECK_INTERVAL);
        health.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            target: "reporter",
            interval = ?self.interval,
            url = %self.supervisor.config().url,
            database = %self.database,
            "Started InfluxDB reporter"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(target: "reporter", "InfluxDB reporter cancellation requested, stopping");
                    break;
                }
                _ = emit.tick() => self.report().await,
                _ = health.tick() => {
                    self.supervisor.health_check().await;
                }
            }
        }
    }

    /// Runs the reporter on a new task until `cancel` is cancelled.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()>
    where
        Self: 'static,
    {
        tokio::spawn(self.run(cancel))
    }

    /// Translates the registry and writes it in a single batch.
    ///
    /// Returns the number of points written. Points left without representable fields are
    /// not sent and not counted.
    pub async fn send(&self) -> Result<usize, EmissionError> {
        let batch = self.batch(SystemTime::now())?;
        let points = batch.points.iter().filter(|point| line::is_encodable(point)).count();
        if points == 0 {
            debug!(target: "reporter", total = batch.len(), "Nothing to write, skipping");
            return Ok(0);
        }

        let client = self.supervisor.client().ok_or(EmissionError::NoClient)?;
        client.write(&batch).await?;
        Ok(points)
    }

    /// Builds the batch for one emission, every point stamped with `now`.
    pub fn batch(&self, now: SystemTime) -> Result<BatchPoints, HostnameError> {
        let prefix = if self.tag_host {
            let mut host = self.hostname.hostname()?;
            host.push('.');
            host
        } else {
            String::new()
        };

        Ok(BatchPoints::new(self.database.clone(), translate(&self.registry, &prefix, now)))
    }

    async fn report(&self) {
        let started = Instant::now();
        match self.send().await {
            Ok(points) => {
                metrics::counter!(Metrics::EMISSIONS, "result" => "success").increment(1);
                metrics::counter!(Metrics::POINTS_WRITTEN).increment(points as u64);
                trace!(target: "reporter", points, "Sent metrics to InfluxDB");
            }
            Err(err) => {
                metrics::counter!(Metrics::EMISSIONS, "result" => "error").increment(1);
                error!(target: "reporter", %err, "Unable to send metrics to InfluxDB");
            }
        }
        metrics::histogram!(Metrics::EMISSION_DURATION).record(started.elapsed().as_secs_f64());
    }
}

/// Returns the deadline one `period` after `start`, clamped for periods the clock cannot add.
fn first_tick(start: Instant, period: Duration) -> Instant {
    start.checked_add(period).unwrap_or_else(|| start + FAR_FUTURE)
}

/// Starts a reporter over HTTP and runs it until `cancel` is cancelled.
///
/// Returns early only if the configuration is invalid or the first client cannot be built.
pub async fn start<R: Registry>(
    registry: R,
    config: ReporterConfig,
    cancel: CancellationToken,
) -> Result<(), ReporterError> {
    let reporter = Reporter::new(registry, &config).inspect_err(|err| {
        error!(target: "reporter", %err, "Unable to start InfluxDB reporter");
    })?;
    reporter.run(cancel).await;
    Ok(())
}

/// Like [`start`], but runs the reporter on a new task.
pub fn spawn<R: Registry + 'static>(
    registry: R,
    config: ReporterConfig,
    cancel: CancellationToken,
) -> Result<JoinHandle<()>, ReporterError> {
    let reporter = Reporter::new(registry, &config).inspect_err(|err| {
        error!(target: "reporter", %err, "Unable to start InfluxDB reporter");
    })?;
    Ok(reporter.spawn(cancel))
}
