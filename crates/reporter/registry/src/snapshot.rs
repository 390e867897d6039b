//! Point-in-time views of registered instruments.

/// A point-in-time reading of a single instrument.
///
/// Every registry entry is read into one of these variants when the registry is iterated.
/// Readings are taken per instrument, so two instruments read in the same pass are not
/// guaranteed to reflect the same instant.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSnapshot {
    /// Monotonic event count.
    Counter(i64),
    /// Signed integer instantaneous value.
    Gauge(i64),
    /// Floating-point instantaneous value.
    FloatGauge(f64),
    /// Distribution of recorded values.
    Histogram(HistogramSnapshot),
    /// Event throughput.
    Meter(MeterSnapshot),
    /// Duration distribution (nanoseconds) plus throughput.
    Timer(TimerSnapshot),
    /// An instrument kind the snapshot model has no shape for.
    Unknown {
        /// Free-form name of the instrument kind.
        kind: String,
    },
}

impl MetricSnapshot {
    /// Returns a short, lowercase name for the variant.
    pub fn kind(&self) -> &str {
        match self {
            Self::Counter(_) => "counter",
            Self::Gauge(_) => "gauge",
            Self::FloatGauge(_) => "float_gauge",
            Self::Histogram(_) => "histogram",
            Self::Meter(_) => "meter",
            Self::Timer(_) => "timer",
            Self::Unknown { kind } => kind.as_str(),
        }
    }
}

/// Statistics over the values retained by a histogram.
///
/// `count` is the total number of values ever recorded. The remaining statistics and the
/// quantiles are computed over `samples`, which may hold only the most recent values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSnapshot {
    /// Number of recorded values.
    pub count: i64,
    /// Smallest retained value.
    pub min: i64,
    /// Largest retained value.
    pub max: i64,
    /// Arithmetic mean of the retained values.
    pub mean: f64,
    /// Population standard deviation of the retained values.
    pub stddev: f64,
    /// Population variance of the retained values.
    pub variance: f64,
    /// Retained values in ascending order.
    pub samples: Vec<i64>,
}

impl HistogramSnapshot {
    /// Builds a snapshot from retained samples and a total record count.
    pub fn from_samples(count: i64, mut samples: Vec<i64>) -> Self {
        if samples.is_empty() {
            return Self { count, ..Default::default() };
        }
        samples.sort_unstable();

        let len = samples.len() as f64;
        let sum: f64 = samples.iter().map(|&v| v as f64).sum();
        let mean = sum / len;
        let variance = samples
            .iter()
            .map(|&v| {
                let delta = v as f64 - mean;
                delta * delta
            })
            .sum::<f64>() /
            len;

        Self {
            count,
            min: samples[0],
            max: samples[samples.len() - 1],
            mean,
            stddev: variance.sqrt(),
            variance,
            samples,
        }
    }

    /// Returns the value at quantile `q` (in `0.0..=1.0`) of the retained samples.
    ///
    /// Values between two samples are linearly interpolated. An empty snapshot reports `0.0`.
    pub fn quantile(&self, q: f64) -> f64 {
        let Some(&last) = self.samples.last() else {
            return 0.0;
        };
        let len = self.samples.len() as f64;
        let pos = q * (len + 1.0);

        if pos < 1.0 {
            self.samples[0] as f64
        } else if pos >= len {
            last as f64
        } else {
            let idx = pos as usize;
            let lower = self.samples[idx - 1] as f64;
            let upper = self.samples[idx] as f64;
            lower + (pos - pos.floor()) * (upper - lower)
        }
    }

    /// Returns the values at each of the given quantiles, in order.
    pub fn quantiles<const N: usize>(&self, qs: [f64; N]) -> [f64; N] {
        qs.map(|q| self.quantile(q))
    }
}

/// Event throughput, in events per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, derive_more::Constructor)]
pub struct MeterSnapshot {
    /// Total number of marked events.
    pub count: i64,
    /// One-minute exponentially weighted moving average rate.
    pub rate1: f64,
    /// Five-minute exponentially weighted moving average rate.
    pub rate5: f64,
    /// Fifteen-minute exponentially weighted moving average rate.
    pub rate15: f64,
    /// Mean rate since the meter was created.
    pub rate_mean: f64,
}

/// A duration distribution combined with its throughput.
///
/// Histogram values are expressed in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, derive_more::Constructor)]
pub struct TimerSnapshot {
    /// Distribution of recorded durations, in nanoseconds.
    pub histogram: HistogramSnapshot,
    /// Rate of recorded durations.
    pub rates: MeterSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_samples_computes_statistics() {
        let snapshot = HistogramSnapshot::from_samples(4, vec![4, 2, 8, 6]);

        assert_eq!(snapshot.count, 4);
        assert_eq!(snapshot.min, 2);
        assert_eq!(snapshot.max, 8);
        assert_eq!(snapshot.mean, 5.0);
        assert_eq!(snapshot.variance, 5.0);
        assert_eq!(snapshot.stddev, 5.0_f64.sqrt());
        assert_eq!(snapshot.samples, vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_from_samples_empty_keeps_count() {
        let snapshot = HistogramSnapshot::from_samples(3, vec![]);
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.min, 0);
        assert_eq!(snapshot.max, 0);
        assert_eq!(snapshot.quantile(0.5), 0.0);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.5, 5.5)]
    #[case(0.75, 8.25)]
    #[case(0.99, 10.0)]
    #[case(1.0, 10.0)]
    fn test_quantile_interpolates(#[case] q: f64, #[case] expected: f64) {
        let snapshot = HistogramSnapshot::from_samples(10, (1..=10).collect());
        assert_eq!(snapshot.quantile(q), expected);
    }

    #[test]
    fn test_quantiles_preserves_order() {
        let snapshot = HistogramSnapshot::from_samples(10, (1..=10).collect());
        assert_eq!(snapshot.quantiles([0.99, 0.5, 0.0]), [10.0, 5.5, 1.0]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MetricSnapshot::Counter(1).kind(), "counter");
        assert_eq!(MetricSnapshot::FloatGauge(1.0).kind(), "float_gauge");
        assert_eq!(MetricSnapshot::Unknown { kind: "sketch".into() }.kind(), "sketch");
    }
}
