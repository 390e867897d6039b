use super::Instrument;
use crate::MetricSnapshot;
use std::sync::atomic::{AtomicI64, Ordering};

/// A monotonically increasing event count.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    /// Creates a counter starting at zero.
    pub const fn new() -> Self {
        Self { count: AtomicI64::new(0) }
    }

    /// Increments the counter by `n`.
    pub fn inc(&self, n: i64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    /// Resets the counter to zero.
    pub fn clear(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    /// Returns the current count.
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Instrument for Counter {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::Counter(self.count())
    }
}
