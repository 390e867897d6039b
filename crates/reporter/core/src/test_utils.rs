//! Mocks shared by the unit tests.

use crate::ClientFactory;
use influx_reporter_client::{
    BatchPoints, ClientConfig, ClientError, InfluxClient, Pong, StatusCode,
};
use metrics::{SharedString, Unit};
use metrics_util::{
    CompositeKey, MetricKind,
    debugging::{DebugValue, DebuggingRecorder},
};
use mockall::mock;
use std::{future::Future, time::Duration};

/// Metrics captured by [`record_metrics`].
pub(crate) type MetricsSnapshot =
    Vec<(CompositeKey, Option<Unit>, Option<SharedString>, DebugValue)>;

mock! {
    #[derive(Debug)]
    pub Client {}

    #[async_trait::async_trait]
    impl InfluxClient for Client {
        async fn ping(&self) -> Result<Pong, ClientError>;
        async fn write(&self, batch: &BatchPoints) -> Result<(), ClientError>;
    }
}

mock! {
    #[derive(Debug)]
    pub Factory {}

    impl ClientFactory for Factory {
        type Client = MockClient;

        fn connect(&self, config: &ClientConfig) -> Result<MockClient, ClientError>;
    }
}

pub(crate) fn client_config() -> ClientConfig {
    ClientConfig::new("http://localhost:8086".parse().unwrap(), "", "")
}

pub(crate) fn ping_ok() -> Result<Pong, ClientError> {
    Ok(Pong { rtt: Duration::from_millis(1), version: Some("1.8.10".to_string()) })
}

pub(crate) fn ping_err() -> Result<Pong, ClientError> {
    Err(unavailable())
}

pub(crate) fn unavailable() -> ClientError {
    ClientError::Status { status: StatusCode::SERVICE_UNAVAILABLE, body: String::new() }
}

/// Drives `fut` to completion on a current-thread runtime and returns every metric it recorded.
pub(crate) fn record_metrics(fut: impl Future<Output = ()>) -> MetricsSnapshot {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

    metrics::with_local_recorder(&recorder, || runtime.block_on(fut));
    snapshotter.snapshot().into_vec()
}

/// Returns the value of the counter `name` with exactly `labels`, if it was recorded.
pub(crate) fn counter_value(
    snapshot: &MetricsSnapshot,
    name: &str,
    labels: &[(&str, &str)],
) -> Option<u64> {
    snapshot.iter().find_map(|(key, _, _, value)| {
        let matches = key.kind() == MetricKind::Counter &&
            key.key().name() == name &&
            key.key().labels().map(|l| (l.key(), l.value())).eq(labels.iter().copied());
        match value {
            DebugValue::Counter(count) if matches => Some(*count),
            _ => None,
        }
    })
}
