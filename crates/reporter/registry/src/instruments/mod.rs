//! Concrete instruments that can be registered in a [`MetricRegistry`].
//!
//! [`MetricRegistry`]: crate::MetricRegistry

use crate::MetricSnapshot;
use std::fmt::Debug;

mod counter;
pub use counter::Counter;

mod gauge;
pub use gauge::{FloatGauge, Gauge};

mod histogram;
pub use histogram::{DEFAULT_RESERVOIR_SIZE, Histogram};

mod meter;
pub use meter::Meter;

mod ewma;

mod timer;
pub use timer::Timer;

/// An instrument whose current state can be read as a [`MetricSnapshot`].
///
/// Implement this for host-specific instruments that should be reported alongside the
/// built-in kinds. Instruments without a matching snapshot shape report
/// [`MetricSnapshot::Unknown`].
pub trait Instrument: Send + Sync + Debug {
    /// Reads the instrument.
    fn snapshot(&self) -> MetricSnapshot;
}
