//! Coercion of loosely-shaped upstream JSON into records and numbers.
//!
//! The position API does not commit to a single envelope or field type:
//! collections arrive bare or wrapped under one of several keys, and numeric
//! fields arrive as JSON numbers or as strings. Everything in this module is
//! total: malformed input yields an empty collection or `None`, never an error.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use std::str::FromStr;

/// Container keys searched, in priority order, when a collection arrives wrapped.
pub const CONTAINER_KEYS: [&str; 8] = [
    "data",
    "positions",
    "items",
    "result",
    "operations",
    "xp_operations",
    "xpOperations",
    "logs",
];

/// Timestamps above this value are taken as epoch milliseconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Returns the ordered records held by `value`.
///
/// A JSON array is returned as-is. An object is searched for the first
/// [`CONTAINER_KEYS`] entry holding an array. Anything else is empty.
pub fn as_records(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => CONTAINER_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Coerces a JSON number or numeric string into a decimal.
///
/// Accepts plain and scientific notation. Booleans, nulls, containers and
/// non-numeric strings are unresolvable.
pub fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

/// Looks up `key` on an object and coerces it with [`decimal`].
pub fn decimal_field(value: &Value, key: &str) -> Option<Decimal> {
    value.get(key).and_then(decimal)
}

/// Tries `keys` in order and returns the first one that resolves to a number.
pub fn first_decimal(value: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|key| decimal_field(value, key))
}

/// Returns the first non-empty string found under `keys`.
pub fn first_text<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Normalizes a seconds-or-milliseconds timestamp to epoch milliseconds.
pub fn epoch_millis(value: &Value) -> Option<i64> {
    let raw = decimal(value)?;
    let millis = if raw > Decimal::from(MILLIS_THRESHOLD) {
        raw
    } else {
        raw.checked_mul(Decimal::from(1000))?
    };
    millis.trunc().to_i64()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
