use super::Instrument;
use crate::{HistogramSnapshot, MetricSnapshot, lock};
use std::{collections::VecDeque, sync::Mutex};

/// Number of values a [`Histogram`] retains unless configured otherwise.
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// A distribution of integer values.
///
/// The histogram keeps a sliding window of the most recently recorded values; statistics and
/// quantiles are computed over that window while the count covers every recorded value.
#[derive(Debug)]
pub struct Histogram {
    capacity: usize,
    state: Mutex<HistogramState>,
}

#[derive(Debug, Default)]
struct HistogramState {
    count: i64,
    samples: VecDeque<i64>,
}

impl Histogram {
    /// Creates a histogram retaining [`DEFAULT_RESERVOIR_SIZE`] values.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RESERVOIR_SIZE)
    }

    /// Creates a histogram retaining at most `capacity` values (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(HistogramState {
                count: 0,
                samples: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Records a value.
    pub fn update(&self, value: i64) {
        let mut state = lock(&self.state);
        state.count = state.count.saturating_add(1);
        if state.samples.len() == self.capacity {
            state.samples.pop_front();
        }
        state.samples.push_back(value);
    }

    /// Drops every recorded value and resets the count.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.count = 0;
        state.samples.clear();
    }

    /// Returns the total number of recorded values.
    pub fn count(&self) -> i64 {
        lock(&self.state).count
    }

    /// Reads the current distribution.
    pub fn histogram_snapshot(&self) -> HistogramSnapshot {
        let (count, samples) = {
            let state = lock(&self.state);
            (state.count, state.samples.iter().copied().collect())
        };
        HistogramSnapshot::from_samples(count, samples)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument for Histogram {
    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::Histogram(self.histogram_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_statistics() {
        let histogram = Histogram::new();
        for value in [10, 20, 30, 40] {
            histogram.update(value);
        }

        let snapshot = histogram.histogram_snapshot();
        assert_eq!(snapshot.count, 4);
        assert_eq!(snapshot.min, 10);
        assert_eq!(snapshot.max, 40);
        assert_eq!(snapshot.mean, 25.0);
    }

    #[test]
    fn test_histogram_window_evicts_oldest() {
        let histogram = Histogram::with_capacity(3);
        for value in 1..=5 {
            histogram.update(value);
        }

        let snapshot = histogram.histogram_snapshot();
        assert_eq!(snapshot.count, 5);
        assert_eq!(snapshot.samples, vec![3, 4, 5]);
        assert_eq!(snapshot.min, 3);
    }

    #[test]
    fn test_histogram_clear() {
        let histogram = Histogram::with_capacity(0);
        histogram.update(1);
        histogram.clear();

        assert_eq!(histogram.count(), 0);
        assert_eq!(histogram.snapshot(), MetricSnapshot::Histogram(HistogramSnapshot::default()));
    }
}
