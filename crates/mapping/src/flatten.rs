//! Wire body to configuration, with one-of variant resolution.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Error, Result};
use crate::path::join;
use crate::spec::{Discriminator, FieldKind, FieldSpec};
use crate::value::{ConfigObject, ConfigValue};

/// Flatten a wire object into a configuration object.
///
/// Absent and null wire values leave the config key unset, except block lists
/// which flatten to an empty list.
///
/// # Errors
///
/// Returns [`Error::MalformedWire`] when a wire value's shape does not match
/// its field, e.g. an array where an object is declared.
pub fn flatten_wire(fields: &[FieldSpec], wire: &Map<String, Value>) -> Result<ConfigObject> {
    flatten_at("", fields, wire)
}

fn flatten_at(parent: &str, fields: &[FieldSpec], wire: &Map<String, Value>) -> Result<ConfigObject> {
    let mut out = ConfigObject::new();
    for field in fields {
        flatten_field(parent, field, wire, &mut out)?;
    }
    Ok(out)
}

fn flatten_field(
    parent: &str,
    field: &FieldSpec,
    wire: &Map<String, Value>,
    out: &mut ConfigObject,
) -> Result<()> {
    if field.schema_only {
        return Ok(());
    }
    let path = join(parent, field.config_key);
    let value = wire_value(&path, wire, field.effective_wire_path())?;

    let flattened = match (field.kind, value) {
        (FieldKind::BlockList(_), None) => Some(ConfigValue::List(Vec::new())),
        (_, None) => None,
        (FieldKind::String, Some(v)) => Some(ConfigValue::String(stringify(&path, v)?)),
        (FieldKind::Bool, Some(v)) => Some(ConfigValue::Bool(
            v.as_bool().ok_or_else(|| Error::malformed(&path, "bool", v))?,
        )),
        (FieldKind::Int, Some(v)) => Some(ConfigValue::Int(integer(&path, v)?)),
        (FieldKind::Float, Some(v)) => Some(ConfigValue::Float(
            v.as_f64().ok_or_else(|| Error::malformed(&path, "number", v))?,
        )),
        (FieldKind::StringList, Some(v)) => {
            let items = array(&path, v)?
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| stringify(&path, item).map(ConfigValue::String))
                .collect::<Result<Vec<_>>>()?;
            Some(ConfigValue::List(items))
        }
        (FieldKind::IntList, Some(v)) => {
            let items = array(&path, v)?
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| integer(&path, item).map(ConfigValue::Int))
                .collect::<Result<Vec<_>>>()?;
            Some(ConfigValue::List(items))
        }
        (FieldKind::Block(children), Some(v)) => {
            let obj = object(&path, v)?;
            Some(ConfigValue::block(flatten_at(&path, children, obj)?))
        }
        (FieldKind::BlockList(children), Some(v)) => {
            let items = array(&path, v)?
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = format!("{path}[{i}]");
                    let obj = object(&item_path, item)?;
                    flatten_at(&item_path, children, obj).map(ConfigValue::Object)
                })
                .collect::<Result<Vec<_>>>()?;
            Some(ConfigValue::List(items))
        }
        (FieldKind::OneOf { .. }, Some(v)) => {
            let obj = object(&path, v)?;
            flatten_one_of(&path, field, obj)?.map(ConfigValue::block)
        }
    };

    if let Some(value) = flattened {
        out.insert(field.config_key.to_string(), value);
    }
    Ok(())
}

fn flatten_one_of(
    path: &str,
    field: &FieldSpec,
    obj: &Map<String, Value>,
) -> Result<Option<ConfigObject>> {
    let Some(variant) = resolve_variant(field, obj) else {
        trace!(
            field = path,
            discriminator = ?discriminator_value(field, obj),
            "no one-of variant matches wire value"
        );
        return Ok(None);
    };
    trace!(field = path, variant = variant.config_key, "resolved one-of variant");

    let mut inner = ConfigObject::new();
    for common in field.children().iter().filter(|c| !c.is_variant()) {
        flatten_field(path, common, obj, &mut inner)?;
    }
    let variant_path = join(path, variant.config_key);
    inner.insert(
        variant.config_key.to_string(),
        ConfigValue::block(flatten_at(&variant_path, variant.children(), obj)?),
    );
    Ok(Some(inner))
}

/// Discriminator value of a one-of's wire object.
///
/// Non-string values count as absent.
#[must_use]
pub fn discriminator_value<'a>(field: &FieldSpec, obj: &'a Map<String, Value>) -> Option<&'a str> {
    match field.kind {
        FieldKind::OneOf {
            discriminator_key, ..
        } => obj.get(discriminator_key).and_then(Value::as_str),
        _ => None,
    }
}

/// Pick the variant of `field` that a wire object belongs to.
///
/// Exact matches come first, then value-set matches, then the default
/// variant; ties go to declaration order.
#[must_use]
pub fn resolve_variant(field: &FieldSpec, obj: &Map<String, Value>) -> Option<&'static FieldSpec> {
    select_variant(field.children(), discriminator_value(field, obj))
}

/// Pick a variant among `children` for a discriminator value.
#[must_use]
pub fn select_variant(
    children: &'static [FieldSpec],
    discriminator: Option<&str>,
) -> Option<&'static FieldSpec> {
    let variants = || children.iter().filter(|c| c.is_variant());
    discriminator
        .and_then(|value| {
            variants()
                .find(|c| c.variant.is_some_and(|d| d.matches_exact(value)))
                .or_else(|| variants().find(|c| c.variant.is_some_and(|d| d.matches_any(value))))
        })
        .or_else(|| variants().find(|c| c.variant == Some(Discriminator::Default)))
}

/// Read the value at a dotted wire path.
///
/// Missing keys and nulls read as absent at any depth; any other non-object
/// value in the middle of the path is malformed.
fn wire_value<'a>(
    path: &str,
    wire: &'a Map<String, Value>,
    wire_path: &str,
) -> Result<Option<&'a Value>> {
    let mut current = wire;
    let mut segments = wire_path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment).filter(|v| !v.is_null());
        if segments.peek().is_none() {
            return Ok(value);
        }
        match value {
            None => return Ok(None),
            Some(Value::Object(inner)) => current = inner,
            Some(other) => return Err(Error::malformed(path, "object", other)),
        }
    }
    Ok(None)
}

fn stringify(path: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::malformed(path, "string", other)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integer(path: &str, value: &Value) -> Result<i64> {
    let Value::Number(n) = value else {
        return Err(Error::malformed(path, "number", value));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    // 2^63 as f64 is exact, so the upper bound is exclusive.
    match n.as_f64().map(f64::trunc) {
        Some(f) if n.is_f64() && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(Error::malformed(path, "int64", value)),
    }
}

fn object<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::malformed(path, "object", value))
}

fn array<'a>(path: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::malformed(path, "array", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    static LINK: &[FieldSpec] = &[FieldSpec::string("label"), FieldSpec::string("link")];

    #[test]
    fn test_scalars_and_stringification() {
        let fields = [
            FieldSpec::string("title"),
            FieldSpec::string("precision_text"),
            FieldSpec::boolean("autoscale"),
            FieldSpec::int("precision"),
            FieldSpec::float("min"),
            FieldSpec::string("missing"),
        ];
        let config = flatten_wire(
            &fields,
            &wire(json!({
                "title": "CPU",
                "precision_text": 2,
                "autoscale": true,
                "precision": 2.9,
                "min": 1,
                "missing": null
            })),
        )
        .unwrap();
        assert_eq!(config["title"], ConfigValue::from("CPU"));
        assert_eq!(config["precision_text"], ConfigValue::from("2"));
        assert_eq!(config["autoscale"], ConfigValue::Bool(true));
        assert_eq!(config["precision"], ConfigValue::Int(2));
        assert_eq!(config["min"], ConfigValue::Float(1.0));
        assert!(!config.contains_key("missing"));
    }

    #[test]
    fn test_wire_path_read() {
        let fields = [FieldSpec::string("live_span").wire_path("time.live_span")];
        let config = flatten_wire(&fields, &wire(json!({"time": {"live_span": "4h"}}))).unwrap();
        assert_eq!(config["live_span"], ConfigValue::from("4h"));
    }

    #[test]
    fn test_non_object_on_wire_path_is_malformed() {
        let fields = [FieldSpec::string("live_span").wire_path("time.live_span")];
        let err = flatten_wire(&fields, &wire(json!({"time": ["1h"]}))).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedWire { ref path, expected: "object", found: "array" } if path == "live_span"
        ));
        assert!(flatten_wire(&fields, &wire(json!({"time": "1h"}))).is_err());

        let absent = flatten_wire(&fields, &wire(json!({"time": null}))).unwrap();
        assert!(absent.is_empty());
        let absent = flatten_wire(&fields, &wire(json!({"time": {}}))).unwrap();
        assert!(absent.is_empty());
    }

    #[test]
    fn test_integers_out_of_range_are_malformed() {
        let fields = [FieldSpec::int("id")];
        let too_big: Value = serde_json::from_str(r#"{"id": 9223372036854775808}"#).unwrap();
        let err = flatten_wire(&fields, too_big.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, Error::MalformedWire { expected: "int64", .. }));
        assert!(flatten_wire(&fields, &wire(json!({"id": 1e300}))).is_err());

        let max = flatten_wire(&fields, &wire(json!({"id": i64::MAX}))).unwrap();
        assert_eq!(max["id"], ConfigValue::Int(i64::MAX));
        let negative = flatten_wire(&fields, &wire(json!({"id": -4.7}))).unwrap();
        assert_eq!(negative["id"], ConfigValue::Int(-4));
    }

    #[test]
    fn test_block_and_block_list_shapes() {
        let fields = [
            FieldSpec::block("style", LINK),
            FieldSpec::block_list("custom_link", LINK).wire_key("custom_links"),
            FieldSpec::block_list("marker", LINK).wire_key("markers"),
        ];
        let config = flatten_wire(
            &fields,
            &wire(json!({"style": {"label": "a"}, "custom_links": [{"link": "l"}]})),
        )
        .unwrap();
        assert_eq!(
            ConfigValue::from(json!([{"label": "a"}])),
            config["style"]
        );
        assert_eq!(ConfigValue::from(json!([{"link": "l"}])), config["custom_link"]);
        assert_eq!(config["marker"], ConfigValue::List(vec![]));
    }

    #[test]
    fn test_malformed_shapes() {
        let block = [FieldSpec::block("style", LINK)];
        let err = flatten_wire(&block, &wire(json!({"style": []}))).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedWire { ref path, expected: "object", found: "array" } if path == "style"
        ));

        let scalar = [FieldSpec::string("title")];
        assert!(flatten_wire(&scalar, &wire(json!({"title": {"a": 1}}))).is_err());

        let int = [FieldSpec::int("precision")];
        assert!(flatten_wire(&int, &wire(json!({"precision": "2"}))).is_err());

        let nested = [FieldSpec::block_list("custom_link", LINK)];
        let err = flatten_wire(&nested, &wire(json!({"custom_link": [{"label": []}]}))).unwrap_err();
        assert!(matches!(err, Error::MalformedWire { ref path, .. } if path == "custom_link[0].label"));
    }

    static TABLE: &[FieldSpec] = &[FieldSpec::string("type")];
    static INLINE: &[FieldSpec] = &[FieldSpec::string("type"), FieldSpec::boolean("hide_value")];
    static LEGEND: &[FieldSpec] = &[
        FieldSpec::block("table", TABLE).variant(Discriminator::AnyOf(&["table", "none"])),
        FieldSpec::block("inline", INLINE).variant(Discriminator::AnyOf(&["inline", "automatic"])),
        FieldSpec::block("exact", TABLE).variant(Discriminator::Exact("none")),
    ];
    static LEGACY: &[FieldSpec] = &[
        FieldSpec::block("modern", LINK).variant(Discriminator::Exact("modern")),
        FieldSpec::block("legacy", LINK).variant(Discriminator::Default),
    ];

    #[test]
    fn test_exact_beats_value_set() {
        let field = FieldSpec::one_of("legend", "type", LEGEND);
        let obj = wire(json!({"type": "none"}));
        assert_eq!(resolve_variant(&field, &obj).map(|v| v.config_key), Some("exact"));
        let obj = wire(json!({"type": "automatic"}));
        assert_eq!(resolve_variant(&field, &obj).map(|v| v.config_key), Some("inline"));
    }

    #[test]
    fn test_default_variant_fallback() {
        let field = FieldSpec::one_of("shape", "type", LEGACY);
        assert_eq!(
            resolve_variant(&field, &wire(json!({"label": "x"}))).map(|v| v.config_key),
            Some("legacy")
        );
        assert_eq!(
            resolve_variant(&field, &wire(json!({"type": "other"}))).map(|v| v.config_key),
            Some("legacy")
        );
        assert_eq!(
            resolve_variant(&field, &wire(json!({"type": 3}))).map(|v| v.config_key),
            Some("legacy")
        );
    }

    #[test]
    fn test_unknown_discriminator_leaves_value_unset() {
        let fields = [FieldSpec::one_of("legend", "type", LEGEND)];
        let config = flatten_wire(&fields, &wire(json!({"legend": {"type": "mystery"}}))).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_one_of_populates_only_selected_slot() {
        let fields = [FieldSpec::one_of("legend", "type", LEGEND)];
        let config = flatten_wire(
            &fields,
            &wire(json!({"legend": {"type": "inline", "hide_value": true}})),
        )
        .unwrap();
        assert_eq!(
            config["legend"],
            ConfigValue::from(json!([{"inline": [{"type": "inline", "hide_value": true}]}]))
        );
    }
}
