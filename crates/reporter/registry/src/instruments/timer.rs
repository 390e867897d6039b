use super::{Histogram, Instrument, Meter};
use crate::{MetricSnapshot, TimerSnapshot};
use std::time::{Duration, Instant};

/// Records durations as a nanosecond [`Histogram`] together with a [`Meter`] of how often
/// they occur.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    /// Creates an empty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a duration. Durations beyond `i64::MAX` nanoseconds saturate.
    pub fn update(&self, duration: Duration) {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    /// Records the time elapsed since `start`.
    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed());
    }

    /// Runs `f` and records how long it took.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.update_since(start);
        out
    }

    /// Returns the number of recorded durations.
    pub fn count(&self) -> i64 {
        self.histogram.count()
    }

    /// Reads the current distribution and rates.
    pub fn timer_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.histogram.histogram_snapshot(), self.meter.meter_snapshot())
    }
}

impl Instrument for Timer {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::Timer(self.timer_snapshot())
    }
}
