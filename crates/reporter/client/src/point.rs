//! Write points and batches.

use std::{collections::BTreeMap, time::SystemTime};

/// A numeric field value, kept in the type the instrument reported.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::From)]
pub enum FieldValue {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
}

impl FieldValue {
    /// Returns the value as an `f64`, converting integers.
    pub const fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns the integer value, or `None` for floats.
    pub const fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

/// A single measurement written to InfluxDB.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// The measurement name.
    pub measurement: String,
    /// Field values keyed by field name, in key order.
    pub fields: BTreeMap<String, FieldValue>,
    /// The time the values were captured.
    pub time: SystemTime,
}

impl Point {
    /// Creates a point without fields.
    pub fn new(measurement: impl Into<String>, time: SystemTime) -> Self {
        Self { measurement: measurement.into(), fields: BTreeMap::new(), time }
    }

    /// Adds a field, replacing any previous value under the same name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the value of field `name`.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).copied()
    }
}

/// The points produced by one emission, addressed to one database.
#[derive(Debug, Clone, PartialEq, derive_more::Constructor)]
pub struct BatchPoints {
    /// Target database.
    pub database: String,
    /// Points in emission order.
    pub points: Vec<Point>,
}

impl BatchPoints {
    /// Returns the number of points in the batch.
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the batch has no points.
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_builder_keeps_field_types() {
        let point = Point::new("requests.count", SystemTime::UNIX_EPOCH)
            .field("value", 42_i64)
            .field("mean", 2.5_f64);

        assert_eq!(point.get("value"), Some(FieldValue::Integer(42)));
        assert_eq!(point.get("mean"), Some(FieldValue::Float(2.5)));
        assert_eq!(point.get("missing"), None);
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::Integer(3).as_f64(), 3.0);
        assert_eq!(FieldValue::Integer(3).as_i64(), Some(3));
        assert_eq!(FieldValue::Float(0.5).as_i64(), None);
    }
}
