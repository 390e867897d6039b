//! Metrics describing the reporter itself.

/// Container for metrics.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of emissions, labeled by `result`.
    pub const EMISSIONS: &str = "influx_reporter_emissions";

    /// Identifier for the counter of points written to the database.
    pub const POINTS_WRITTEN: &str = "influx_reporter_points_written";

    /// Identifier for the histogram of emission durations, in seconds.
    pub const EMISSION_DURATION: &str = "influx_reporter_emission_duration_seconds";

    /// Identifier for the counter of failed health check pings.
    pub const PING_FAILURES: &str = "influx_reporter_ping_failures";

    /// Identifier for the counter of client rebuilds, labeled by `result`.
    pub const CLIENT_REBUILDS: &str = "influx_reporter_client_rebuilds";

    /// Initializes metrics for the reporter.
    ///
    /// This does two things:
    /// * Describes various metrics.
    /// * Initializes metrics to 0 so they can be queried immediately.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    /// Describes metrics used in [`influx_reporter_core`][crate].
    pub fn describe() {
        metrics::describe_counter!(Self::EMISSIONS, "Number of registry emissions by result");
        metrics::describe_counter!(Self::POINTS_WRITTEN, "Number of points written to InfluxDB");
        metrics::describe_histogram!(
            Self::EMISSION_DURATION,
            metrics::Unit::Seconds,
            "Time taken to translate and write one registry snapshot"
        );
        metrics::describe_counter!(Self::PING_FAILURES, "Number of failed InfluxDB pings");
        metrics::describe_counter!(Self::CLIENT_REBUILDS, "Number of client rebuilds by result");
    }

    /// Initializes metrics to `0` so they can be queried immediately.
    pub fn zero() {
        metrics::counter!(Self::EMISSIONS, "result" => "success").absolute(0);
        metrics::counter!(Self::EMISSIONS, "result" => "error").absolute(0);
        metrics::counter!(Self::POINTS_WRITTEN).absolute(0);
        metrics::counter!(Self::PING_FAILURES).absolute(0);
        metrics::counter!(Self::CLIENT_REBUILDS, "result" => "success").absolute(0);
        metrics::counter!(Self::CLIENT_REBUILDS, "result" => "error").absolute(0);
    }
}
