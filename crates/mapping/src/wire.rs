//! Comparison of wire bodies.
//!
//! A build → flatten → build cycle only reproduces a body up to zero values:
//! omitted fields come back absent, absent ones may come back as zeros.
//! [`equivalent`] compares modulo that.

use serde_json::Value;

/// Whether `value` is a zero value: null, `""`, `false`, `0`, an empty array,
/// or an object whose members are all zero.
#[must_use]
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(is_zero),
    }
}

/// Whether two wire bodies agree on every non-zero value.
///
/// Numbers compare numerically, so `1` and `1.0` are equivalent.
#[must_use]
pub fn equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let left_ok = left.iter().all(|(key, lv)| {
                right
                    .get(key)
                    .map_or_else(|| is_zero(lv), |rv| equivalent(lv, rv))
            });
            let right_ok = right
                .iter()
                .filter(|(key, _)| !left.contains_key(*key))
                .all(|(_, rv)| is_zero(rv));
            left_ok && right_ok
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| equivalent(l, r))
        }
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        _ if is_zero(a) && is_zero(b) => true,
        _ => a == b,
    }
}
