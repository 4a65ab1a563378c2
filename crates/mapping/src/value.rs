//! Configuration value tree.
//!
//! Mirrors the typed attribute values a plan carries: every value may be null
//! or not yet known, nested blocks are lists of objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Object node of a configuration tree.
pub type ConfigObject = BTreeMap<String, ConfigValue>;

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicitly unset
    #[default]
    Null,
    /// Not known until apply
    Unknown,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// List of values; blocks are lists of objects
    List(Vec<ConfigValue>),
    /// Object
    Object(ConfigObject),
}

impl ConfigValue {
    /// Whether the value carries something usable. Null and unknown do not.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Null | Self::Unknown)
    }

    /// String content.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer content.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content, integers widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// List content.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Object content.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ConfigObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The object of a single nested block.
    ///
    /// Blocks are stored as one-element lists of objects; a bare object is
    /// accepted as well. Null and unknown elements count as absent.
    #[must_use]
    pub fn block_object(&self) -> Option<&ConfigObject> {
        match self {
            Self::List(items) => items.first().and_then(Self::as_object),
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Mutable access to the object of a single nested block.
    pub fn block_object_mut(&mut self) -> Option<&mut ConfigObject> {
        match self {
            Self::List(items) => items.first_mut().and_then(|item| match item {
                Self::Object(obj) => Some(obj),
                _ => None,
            }),
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Wrap an object as a single nested block.
    #[must_use]
    pub fn block(obj: ConfigObject) -> Self {
        Self::List(vec![Self::Object(obj)])
    }

    /// Short name of the value's kind, used in messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unknown => "unknown",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<ConfigObject> for ConfigValue {
    fn from(value: ConfigObject) -> Self {
        Self::Object(value)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&ConfigValue> for serde_json::Value {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Null | ConfigValue::Unknown => Self::Null,
            ConfigValue::Bool(b) => Self::Bool(*b),
            ConfigValue::Int(i) => Self::from(*i),
            ConfigValue::Float(f) => Self::from(*f),
            ConfigValue::String(s) => Self::String(s.clone()),
            ConfigValue::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            ConfigValue::Object(obj) => Self::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Convert a JSON object into a configuration object.
#[must_use]
pub fn object_from_json(map: serde_json::Map<String, serde_json::Value>) -> ConfigObject {
    map.into_iter()
        .map(|(k, v)| (k, ConfigValue::from(v)))
        .collect()
}
