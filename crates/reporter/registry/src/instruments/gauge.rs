use super::Instrument;
use crate::MetricSnapshot;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// A signed integer value that is overwritten on every update.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    /// Creates a gauge reading zero.
    pub const fn new() -> Self {
        Self { value: AtomicI64::new(0) }
    }

    /// Sets the gauge.
    pub fn update(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Returns the current value.
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Instrument for Gauge {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::Gauge(self.value())
    }
}

/// A floating-point value that is overwritten on every update.
///
/// The value is stored as its IEEE-754 bit pattern so reads and writes stay lock-free.
#[derive(Debug, Default)]
pub struct FloatGauge {
    bits: AtomicU64,
}

impl FloatGauge {
    /// Creates a gauge reading `0.0`.
    pub const fn new() -> Self {
        Self { bits: AtomicU64::new(0) }
    }

    /// Sets the gauge.
    pub fn update(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Returns the current value.
    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Instrument for FloatGauge {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::FloatGauge(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_keeps_last_value() {
        let gauge = Gauge::new();
        gauge.update(7);
        gauge.update(-3);
        assert_eq!(gauge.snapshot(), MetricSnapshot::Gauge(-3));
    }

    #[test]
    fn test_float_gauge_round_trips_bits() {
        let gauge = FloatGauge::new();
        assert_eq!(gauge.value(), 0.0);

        gauge.update(0.125);
        assert_eq!(gauge.snapshot(), MetricSnapshot::FloatGauge(0.125));
    }
}
