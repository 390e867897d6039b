//! A synthetic workload feeding every instrument kind.

use anyhow::Result;
use influx_reporter_registry::MetricRegistry;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Delay between two iterations of the workload.
const STEP: Duration = Duration::from_millis(250);

/// Registers the workload instruments and updates them until `cancel` is cancelled.
pub fn spawn(registry: Arc<MetricRegistry>, cancel: CancellationToken) -> Result<JoinHandle<()>> {
    let iterations = registry.counter("workload.iterations")?;
    let uptime = registry.gauge("workload.uptime_seconds")?;
    let load = registry.float_gauge("workload.load")?;
    let batch_size = registry.histogram("workload.batch_size")?;
    let items = registry.meter("workload.items")?;
    let step = registry.timer("workload.step")?;

    Ok(tokio::spawn(async move {
        let started = Instant::now();
        let mut iteration: i64 = 0;

        loop {
            let begin = Instant::now();
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(target: "workload", iterations = iteration, "Workload stopped");
                    break;
                }
                _ = tokio::time::sleep(STEP) => {}
            }

            iteration += 1;
            let size = 1 + iteration % 16;
            iterations.inc(1);
            uptime.update(started.elapsed().as_secs() as i64);
            load.update((iteration as f64 / 10.0).sin().abs());
            batch_size.update(size);
            items.mark(size);
            step.update(begin.elapsed());
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use influx_reporter_registry::{MetricSnapshot, Registry};

    #[tokio::test(start_paused = true)]
    async fn test_workload_updates_every_kind() {
        let registry = Arc::new(MetricRegistry::new());
        let cancel = CancellationToken::new();
        let handle = spawn(Arc::clone(&registry), cancel.clone()).unwrap();

        tokio::time::sleep(STEP * 4 + STEP / 2).await;
        cancel.cancel();
        handle.await.unwrap();

        let snapshot = registry.snapshot();
        let kinds: Vec<_> = snapshot.iter().map(|(name, m)| (name.as_str(), m.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("workload.batch_size", "histogram"),
                ("workload.items", "meter"),
                ("workload.iterations", "counter"),
                ("workload.load", "float_gauge"),
                ("workload.step", "timer"),
                ("workload.uptime_seconds", "gauge"),
            ]
        );
        assert_eq!(snapshot[2].1, MetricSnapshot::Counter(4));
    }
}
