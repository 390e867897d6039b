//! Translation of registry snapshots into InfluxDB write points.
//!
//! Every instrument becomes at most one point whose measurement is
//! `<prefix><metric name><suffix>`, the suffix naming the instrument kind:
//!
//! | Kind | Suffix | Fields |
//! |---|---|---|
//! | counter | `.count` | `value` |
//! | gauge, float gauge | `.gauge` | `value` |
//! | histogram | `.histogram` | `count, max, mean, min, stddev, variance, p50 .. p9999` |
//! | meter | `.meter` | `count, m1, m5, m15, mean` |
//! | timer | `.timer` | histogram fields in milliseconds, `m1, m5, m15, meanrate` |
//!
//! Instruments of unknown kinds are skipped.

use influx_reporter_client::Point;
use influx_reporter_registry::{
    HistogramSnapshot, MeterSnapshot, MetricSnapshot, Registry, TimerSnapshot,
};
use std::time::SystemTime;

/// Measurement suffix of counters.
pub const COUNTER_SUFFIX: &str = ".count";
/// Measurement suffix of integer and float gauges.
pub const GAUGE_SUFFIX: &str = ".gauge";
/// Measurement suffix of histograms.
pub const HISTOGRAM_SUFFIX: &str = ".histogram";
/// Measurement suffix of meters.
pub const METER_SUFFIX: &str = ".meter";
/// Measurement suffix of timers.
pub const TIMER_SUFFIX: &str = ".timer";

/// Quantiles reported for histograms and timers.
pub const QUANTILES: [f64; 6] = [0.5, 0.75, 0.95, 0.99, 0.999, 0.9999];

/// Field names of [`QUANTILES`], in the same order.
const QUANTILE_FIELDS: [&str; 6] = ["p50", "p75", "p95", "p99", "p999", "p9999"];

/// Timer values are recorded in nanoseconds and reported in milliseconds.
const NANOS_PER_MILLI: i64 = 1_000_000;

/// Translates every instrument in `registry` into a point stamped with `now`.
///
/// `prefix` is prepended verbatim to every measurement; pass `""` for none.
pub fn translate<R>(registry: &R, prefix: &str, now: SystemTime) -> Vec<Point>
where
    R: Registry + ?Sized,
{
    let mut points = Vec::new();
    registry.each(&mut |name, metric| {
        if let Some(point) = translate_metric(prefix, name, &metric, now) {
            points.push(point);
        }
    });
    points
}

/// Translates a single instrument. Returns `None` for kinds without a known shape.
pub fn translate_metric(
    prefix: &str,
    name: &str,
    metric: &MetricSnapshot,
    now: SystemTime,
) -> Option<Point> {
    let point = match metric {
        MetricSnapshot::Counter(count) => {
            Point::new(measurement(prefix, name, COUNTER_SUFFIX), now).field("value", *count)
        }
        MetricSnapshot::Gauge(value) => {
            Point::new(measurement(prefix, name, GAUGE_SUFFIX), now).field("value", *value)
        }
        MetricSnapshot::FloatGauge(value) => {
            Point::new(measurement(prefix, name, GAUGE_SUFFIX), now).field("value", *value)
        }
        MetricSnapshot::Histogram(histogram) => {
            histogram_point(measurement(prefix, name, HISTOGRAM_SUFFIX), histogram, now)
        }
        MetricSnapshot::Meter(meter) => {
            meter_point(measurement(prefix, name, METER_SUFFIX), meter, now)
        }
        MetricSnapshot::Timer(timer) => {
            timer_point(measurement(prefix, name, TIMER_SUFFIX), timer, now)
        }
        MetricSnapshot::Unknown { .. } => return None,
    };
    Some(point)
}

fn measurement(prefix: &str, name: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + name.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(name);
    out.push_str(suffix);
    out
}

fn histogram_point(measurement: String, h: &HistogramSnapshot, now: SystemTime) -> Point {
    let point = Point::new(measurement, now)
        .field("count", h.count)
        .field("max", h.max)
        .field("mean", h.mean)
        .field("min", h.min)
        .field("stddev", h.stddev)
        .field("variance", h.variance);

    QUANTILE_FIELDS
        .into_iter()
        .zip(h.quantiles(QUANTILES))
        .fold(point, |point, (field, value)| point.field(field, value))
}

fn meter_point(measurement: String, m: &MeterSnapshot, now: SystemTime) -> Point {
    Point::new(measurement, now)
        .field("count", m.count)
        .field("m1", m.rate1)
        .field("m5", m.rate5)
        .field("m15", m.rate15)
        .field("mean", m.rate_mean)
}

fn timer_point(measurement: String, t: &TimerSnapshot, now: SystemTime) -> Point {
    let h = &t.histogram;
    let millis = NANOS_PER_MILLI as f64;

    // min and max stay integers, truncated to whole milliseconds.
    let point = Point::new(measurement, now)
        .field("count", h.count)
        .field("max", h.max / NANOS_PER_MILLI)
        .field("mean", h.mean / millis)
        .field("min", h.min / NANOS_PER_MILLI)
        .field("stddev", h.stddev / millis)
        .field("variance", h.variance / millis);

    QUANTILE_FIELDS
        .into_iter()
        .zip(h.quantiles(QUANTILES))
        .fold(point, |point, (field, value)| point.field(field, value / millis))
        .field("m1", t.rates.rate1)
        .field("m5", t.rates.rate5)
        .field("m15", t.rates.rate15)
        .field("meanrate", t.rates.rate_mean)
}
