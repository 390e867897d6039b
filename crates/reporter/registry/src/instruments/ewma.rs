//! Exponentially weighted moving averages ticked on a fixed interval.

use std::time::Duration;

/// Interval between two EWMA ticks.
pub(super) const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// A moving average of a per-second rate.
#[derive(Debug, Clone)]
pub(super) struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: i64,
    initialized: bool,
}

impl Ewma {
    /// An average decaying over `minutes` minutes.
    pub(super) fn over_minutes(minutes: f64) -> Self {
        let alpha = 1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp();
        Self { alpha, rate: 0.0, uncounted: 0, initialized: false }
    }

    /// Adds `n` events to the current interval.
    pub(super) fn update(&mut self, n: i64) {
        self.uncounted = self.uncounted.saturating_add(n);
    }

    /// Folds the current interval into the average.
    pub(super) fn tick(&mut self) {
        let instant = self.uncounted as f64 / TICK_INTERVAL.as_secs_f64();
        self.uncounted = 0;
        if self.initialized {
            self.rate += self.alpha * (instant - self.rate);
        } else {
            self.rate = instant;
            self.initialized = true;
        }
    }

    /// Events per second.
    pub(super) const fn rate(&self) -> f64 {
        self.rate
    }
}
