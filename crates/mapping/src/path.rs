//! Wire key resolution and dotted path access.

use serde_json::{Map, Value};

use crate::spec::FieldSpec;

impl FieldSpec {
    /// Top-level key this field occupies in its parent wire object.
    ///
    /// The first segment of the wire path wins, then the wire key, then the
    /// config key.
    #[must_use]
    pub fn effective_wire_key(&self) -> &'static str {
        if let Some(path) = self.wire_path {
            return path.split_once('.').map_or(path, |(head, _)| head);
        }
        self.wire_key.unwrap_or(self.config_key)
    }

    /// Full dotted wire path of this field.
    #[must_use]
    pub fn effective_wire_path(&self) -> &'static str {
        self.wire_path
            .or(self.wire_key)
            .unwrap_or(self.config_key)
    }
}

/// Read the value at a dotted path.
///
/// Missing keys, null values and non-object intermediates all read as absent.
#[must_use]
pub fn get_at_path<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        None => object.get(path).filter(|v| !v.is_null()),
        Some((head, rest)) => match object.get(head) {
            Some(Value::Object(inner)) => get_at_path(inner, rest),
            _ => None,
        },
    }
}

/// Write `value` at a dotted path, creating intermediate objects.
///
/// A non-object intermediate is replaced by an object.
pub fn set_at_path(object: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            object.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = object
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(inner) = slot {
                set_at_path(inner, rest, value);
            }
        }
    }
}

/// Join a dotted config path.
#[must_use]
pub fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
