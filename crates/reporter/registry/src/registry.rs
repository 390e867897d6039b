//! The [`Registry`] capability and its in-memory implementation.

use crate::{
    Counter, FloatGauge, Gauge, Histogram, Instrument, Meter, MetricSnapshot, RegistryError, Timer,
};
use auto_impl::auto_impl;
use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

/// A named collection of instruments that can be read as a whole.
#[auto_impl(&, Arc, Box)]
pub trait Registry: Send + Sync {
    /// Reads every registered instrument and passes it to `f` along with its name.
    ///
    /// Implementations must not hold internal locks while calling `f`.
    fn each(&self, f: &mut dyn FnMut(&str, MetricSnapshot));

    /// Collects every registered instrument into a vector.
    fn snapshot(&self) -> Vec<(String, MetricSnapshot)> {
        let mut out = Vec::new();
        self.each(&mut |name, metric| out.push((name.to_string(), metric)));
        out
    }
}

/// An instrument held by a [`MetricRegistry`].
#[derive(Debug, Clone, derive_more::From)]
pub enum RegisteredInstrument {
    /// A [`Counter`].
    Counter(Arc<Counter>),
    /// A [`Gauge`].
    Gauge(Arc<Gauge>),
    /// A [`FloatGauge`].
    FloatGauge(Arc<FloatGauge>),
    /// A [`Histogram`].
    Histogram(Arc<Histogram>),
    /// A [`Meter`].
    Meter(Arc<Meter>),
    /// A [`Timer`].
    Timer(Arc<Timer>),
    /// Any other [`Instrument`] implementation.
    Custom(Arc<dyn Instrument>),
}

impl RegisteredInstrument {
    /// Reads the instrument.
    pub fn snapshot(&self) -> MetricSnapshot {
        match self {
            Self::Counter(m) => m.snapshot(),
            Self::Gauge(m) => m.snapshot(),
            Self::FloatGauge(m) => m.snapshot(),
            Self::Histogram(m) => m.snapshot(),
            Self::Meter(m) => m.snapshot(),
            Self::Timer(m) => m.snapshot(),
            Self::Custom(m) => m.snapshot(),
        }
    }

    /// Returns the kind name of the instrument.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Counter(_) => "counter",
            Self::Gauge(_) => "gauge",
            Self::FloatGauge(_) => "float_gauge",
            Self::Histogram(_) => "histogram",
            Self::Meter(_) => "meter",
            Self::Timer(_) => "timer",
            Self::Custom(_) => "custom",
        }
    }
}

/// A thread-safe, in-memory [`Registry`].
///
/// Instruments are shared through [`Arc`]s: the host keeps a handle to update the instrument,
/// the registry keeps one to read it.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: RwLock<BTreeMap<String, RegisteredInstrument>>,
}

impl MetricRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `instrument` under `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        instrument: impl Into<RegisteredInstrument>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        if metrics.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        metrics.insert(name, instrument.into());
        Ok(())
    }

    /// Removes the instrument registered under `name`, returning it.
    pub fn unregister(&self, name: &str) -> Option<RegisteredInstrument> {
        self.metrics.write().unwrap_or_else(PoisonError::into_inner).remove(name)
    }

    /// Returns the instrument registered under `name`.
    pub fn get(&self, name: &str) -> Option<RegisteredInstrument> {
        self.metrics.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }

    /// Returns the number of registered instruments.
    pub fn len(&self) -> usize {
        self.metrics.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the [`Counter`] named `name`, registering a new one if absent.
    pub fn counter(&self, name: &str) -> Result<Arc<Counter>, RegistryError> {
        self.get_or_register(name, "counter", |m| match m {
            RegisteredInstrument::Counter(c) => Some(Arc::clone(c)),
            _ => None,
        })
    }

    /// Returns the [`Gauge`] named `name`, registering a new one if absent.
    pub fn gauge(&self, name: &str) -> Result<Arc<Gauge>, RegistryError> {
        self.get_or_register(name, "gauge", |m| match m {
            RegisteredInstrument::Gauge(g) => Some(Arc::clone(g)),
            _ => None,
        })
    }

    /// Returns the [`FloatGauge`] named `name`, registering a new one if absent.
    pub fn float_gauge(&self, name: &str) -> Result<Arc<FloatGauge>, RegistryError> {
        self.get_or_register(name, "float_gauge", |m| match m {
            RegisteredInstrument::FloatGauge(g) => Some(Arc::clone(g)),
            _ => None,
        })
    }

    /// Returns the [`Histogram`] named `name`, registering a new one if absent.
    pub fn histogram(&self, name: &str) -> Result<Arc<Histogram>, RegistryError> {
        self.get_or_register(name, "histogram", |m| match m {
            RegisteredInstrument::Histogram(h) => Some(Arc::clone(h)),
            _ => None,
        })
    }

    /// Returns the [`Meter`] named `name`, registering a new one if absent.
    pub fn meter(&self, name: &str) -> Result<Arc<Meter>, RegistryError> {
        self.get_or_register(name, "meter", |m| match m {
            RegisteredInstrument::Meter(m) => Some(Arc::clone(m)),
            _ => None,
        })
    }

    /// Returns the [`Timer`] named `name`, registering a new one if absent.
    pub fn timer(&self, name: &str) -> Result<Arc<Timer>, RegistryError> {
        self.get_or_register(name, "timer", |m| match m {
            RegisteredInstrument::Timer(t) => Some(Arc::clone(t)),
            _ => None,
        })
    }

    fn get_or_register<T>(
        &self,
        name: &str,
        expected: &'static str,
        extract: impl Fn(&RegisteredInstrument) -> Option<Arc<T>>,
    ) -> Result<Arc<T>, RegistryError>
    where
        T: Default,
        Arc<T>: Into<RegisteredInstrument>,
    {
        let mismatch = |found: &RegisteredInstrument| RegistryError::KindMismatch {
            name: name.to_string(),
            expected,
            found: found.kind(),
        };

        if let Some(existing) = self.get(name) {
            return extract(&existing).ok_or_else(|| mismatch(&existing));
        }

        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        let entry =
            &*metrics.entry(name.to_string()).or_insert_with(|| Arc::new(T::default()).into());
        extract(entry).ok_or_else(|| mismatch(entry))
    }
}

impl Registry for MetricRegistry {
    fn each(&self, f: &mut dyn FnMut(&str, MetricSnapshot)) {
        // Read instruments outside the map lock so registration is never blocked on a read.
        let entries: Vec<_> = self
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, instrument)| (name.clone(), instrument.clone()))
            .collect();

        for (name, instrument) in entries {
            f(&name, instrument.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    struct Sketch;

    impl Instrument for Sketch {
        fn snapshot(&self) -> MetricSnapshot {
            MetricSnapshot::Unknown { kind: "sketch".to_string() }
        }
    }

    #[test]
    fn test_get_or_register_returns_same_instrument() {
        let registry = MetricRegistry::new();
        let first = registry.counter("requests").unwrap();
        first.inc(2);

        let second = registry.counter("requests").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.count(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_register_rejects_kind_mismatch() {
        let registry = MetricRegistry::new();
        registry.gauge("load").unwrap();

        let err = registry.counter("load").unwrap_err();
        assert_eq!(
            err,
            RegistryError::KindMismatch {
                name: "load".to_string(),
                expected: "counter",
                found: "gauge",
            }
        );
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = MetricRegistry::new();
        registry.register("queue", Arc::new(Gauge::new())).unwrap();

        let err = registry.register("queue", Arc::new(Counter::new())).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("queue".to_string()));
    }

    #[test]
    fn test_unregister_removes_instrument() {
        let registry = MetricRegistry::new();
        registry.meter("events").unwrap();

        assert!(registry.unregister("events").is_some());
        assert!(registry.get("events").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_reads_every_kind() {
        let registry = MetricRegistry::new();
        registry.counter("a").unwrap().inc(1);
        registry.gauge("b").unwrap().update(-2);
        registry.float_gauge("c").unwrap().update(0.5);
        registry.histogram("d").unwrap().update(10);
        registry.meter("e").unwrap().mark(1);
        registry.timer("f").unwrap().update(Duration::from_millis(2));
        registry.register("g", Arc::new(Sketch) as Arc<dyn Instrument>).unwrap();

        let snapshot = registry.snapshot();
        let kinds: Vec<_> = snapshot.iter().map(|(name, m)| (name.as_str(), m.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("a", "counter"),
                ("b", "gauge"),
                ("c", "float_gauge"),
                ("d", "histogram"),
                ("e", "meter"),
                ("f", "timer"),
                ("g", "sketch"),
            ]
        );
        assert_eq!(snapshot[0].1, MetricSnapshot::Counter(1));
        assert_eq!(snapshot[1].1, MetricSnapshot::Gauge(-2));
    }

    #[test]
    fn test_registry_through_arc() {
        let registry = Arc::new(MetricRegistry::new());
        registry.counter("hits").unwrap().inc(5);

        fn read(registry: impl Registry) -> Vec<(String, MetricSnapshot)> {
            registry.snapshot()
        }

        assert_eq!(
            read(Arc::clone(&registry)),
            vec![("hits".to_string(), MetricSnapshot::Counter(5))]
        );
    }
}
