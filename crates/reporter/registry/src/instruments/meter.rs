use super::{
    Instrument,
    ewma::{Ewma, TICK_INTERVAL},
};
use crate::{MeterSnapshot, MetricSnapshot, lock};
use std::{sync::Mutex, time::Instant};

/// Measures the rate at which events occur.
///
/// Rates are folded into 1, 5 and 15 minute moving averages every five seconds. Ticks are
/// applied lazily when the meter is marked or read, so an idle meter costs nothing.
#[derive(Debug)]
pub struct Meter {
    started_at: Instant,
    state: Mutex<MeterState>,
}

#[derive(Debug)]
struct MeterState {
    count: i64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
    last_tick: Instant,
}

impl MeterState {
    fn tick_to(&mut self, now: Instant) {
        while now.saturating_duration_since(self.last_tick) >= TICK_INTERVAL {
            self.last_tick += TICK_INTERVAL;
            self.m1.tick();
            self.m5.tick();
            self.m15.tick();
        }
    }
}

impl Meter {
    /// Creates a meter whose mean rate is measured from now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    fn started_at(started_at: Instant) -> Self {
        Self {
            started_at,
            state: Mutex::new(MeterState {
                count: 0,
                m1: Ewma::over_minutes(1.0),
                m5: Ewma::over_minutes(5.0),
                m15: Ewma::over_minutes(15.0),
                last_tick: started_at,
            }),
        }
    }

    /// Records `n` events.
    pub fn mark(&self, n: i64) {
        self.mark_at(n, Instant::now());
    }

    fn mark_at(&self, n: i64, now: Instant) {
        let mut state = lock(&self.state);
        state.tick_to(now);
        state.count = state.count.saturating_add(n);
        state.m1.update(n);
        state.m5.update(n);
        state.m15.update(n);
    }

    /// Returns the number of recorded events.
    pub fn count(&self) -> i64 {
        lock(&self.state).count
    }

    /// Reads the current rates.
    pub fn meter_snapshot(&self) -> MeterSnapshot {
        self.snapshot_at(Instant::now())
    }

    fn snapshot_at(&self, now: Instant) -> MeterSnapshot {
        let mut state = lock(&self.state);
        state.tick_to(now);

        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        let rate_mean = if elapsed > 0.0 { state.count as f64 / elapsed } else { 0.0 };

        MeterSnapshot::new(
            state.count,
            state.m1.rate(),
            state.m5.rate(),
            state.m15.rate(),
            rate_mean,
        )
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for Meter {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::Meter(self.meter_snapshot())
    }
}
