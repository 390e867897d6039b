//! InfluxDB line protocol encoding.
//!
//! Each point becomes one line:
//!
//! ```text
//! <measurement> <field>=<value>[,<field>=<value>...] <timestamp>
//! ```
//!
//! Timestamps are nanoseconds since the unix epoch. Integers carry an `i` suffix, floats are
//! written in their shortest round-trip form. Non-finite floats cannot be represented and are
//! dropped; a point left without fields is dropped entirely.

use crate::{FieldValue, Point};
use std::{
    fmt::Write as _,
    time::{SystemTime, UNIX_EPOCH},
};

/// Encodes `points` as a newline separated line protocol body.
pub fn encode<'a>(points: impl IntoIterator<Item = &'a Point>) -> String {
    let mut body = String::new();
    for point in points {
        if write_point(&mut body, point) {
            body.push('\n');
        }
    }
    body
}

/// Returns `true` if `point` has at least one field that can be encoded.
pub fn is_encodable(point: &Point) -> bool {
    point.fields.values().any(is_encodable_value)
}

fn is_encodable_value(value: &FieldValue) -> bool {
    !matches!(value, FieldValue::Float(v) if !v.is_finite())
}

/// Appends the line for `point` to `out`. Returns `false`, leaving `out` untouched, when the
/// point has no representable fields.
pub fn write_point(out: &mut String, point: &Point) -> bool {
    let start = out.len();
    escape_into(out, &point.measurement, &[',', ' ']);

    let mut written = 0;
    for (name, value) in &point.fields {
        if !is_encodable_value(value) {
            continue;
        }

        out.push(if written == 0 { ' ' } else { ',' });
        escape_into(out, name, &[',', '=', ' ']);
        out.push('=');
        match value {
            FieldValue::Integer(v) => {
                let _ = write!(out, "{v}i");
            }
            FieldValue::Float(v) => {
                let _ = write!(out, "{v}");
            }
        }
        written += 1;
    }

    if written == 0 {
        out.truncate(start);
        return false;
    }

    let _ = write!(out, " {}", timestamp_nanos(point.time));
    true
}

/// Nanoseconds between the unix epoch and `time`, negative before the epoch.
pub fn timestamp_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_nanos()).map_or(i64::MIN, |n| -n),
    }
}

fn escape_into(out: &mut String, raw: &str, special: &[char]) {
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
