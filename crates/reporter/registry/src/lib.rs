#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::RegistryError;

mod snapshot;
pub use snapshot::{HistogramSnapshot, MeterSnapshot, MetricSnapshot, TimerSnapshot};

pub mod instruments;
pub use instruments::{Counter, FloatGauge, Gauge, Histogram, Instrument, Meter, Timer};

mod registry;
pub use registry::{MetricRegistry, RegisteredInstrument, Registry};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a writer panicked.
///
/// Instrument state stays internally consistent across a panic, so a poisoned lock is safe to
/// keep using.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
