//! Configuration to wire body.

use serde_json::{Map, Value};
use tracing::trace;

use crate::path::set_at_path;
use crate::spec::{FieldKind, FieldSpec};
use crate::value::{ConfigObject, ConfigValue};

static EMPTY: ConfigObject = ConfigObject::new();

/// Build the wire object for `fields` from a configuration object.
///
/// Null and unknown configuration values count as unset. Unset scalars take
/// their declared default, or are written as their zero value unless the field
/// omits zero values.
#[must_use]
pub fn build_wire(fields: &[FieldSpec], config: &ConfigObject) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        build_field(field, config, &mut out);
    }
    out
}

/// Build one field of `config` into `out`.
pub fn build_field(field: &FieldSpec, config: &ConfigObject, out: &mut Map<String, Value>) {
    if field.schema_only {
        return;
    }
    let raw = config.get(field.config_key).filter(|v| v.is_known());
    let fallback = field
        .default
        .filter(|_| raw.is_none())
        .map(ConfigValue::from);
    let raw = raw.or(fallback.as_ref());
    let omit = field.omit_if_zero;

    let value = match field.kind {
        FieldKind::String => {
            let s = raw.and_then(ConfigValue::as_str).unwrap_or_default();
            (!(omit && s.is_empty())).then(|| Value::String(s.to_string()))
        }
        FieldKind::Bool => {
            let b = raw.and_then(ConfigValue::as_bool).unwrap_or_default();
            (!(omit && !b)).then_some(Value::Bool(b))
        }
        FieldKind::Int => {
            let n = raw.and_then(ConfigValue::as_int).unwrap_or_default();
            (!(omit && n == 0)).then(|| Value::from(n))
        }
        FieldKind::Float => {
            let f = raw.and_then(ConfigValue::as_float).unwrap_or_default();
            (!(omit && f == 0.0)).then(|| Value::from(f))
        }
        FieldKind::StringList => {
            let items: Vec<Value> = list_items(raw)
                .filter_map(ConfigValue::as_str)
                .map(|s| Value::String(s.to_string()))
                .collect();
            (!(omit && items.is_empty())).then_some(Value::Array(items))
        }
        FieldKind::IntList => {
            let items: Vec<Value> = list_items(raw)
                .filter_map(ConfigValue::as_int)
                .map(Value::from)
                .collect();
            (!(omit && items.is_empty())).then_some(Value::Array(items))
        }
        FieldKind::Block(children) => {
            let nested = raw.and_then(ConfigValue::block_object);
            if nested.is_none() && omit {
                None
            } else {
                let built = build_wire(children, nested.unwrap_or(&EMPTY));
                (!(omit && built.is_empty())).then_some(Value::Object(built))
            }
        }
        FieldKind::BlockList(children) => {
            let items: Vec<Value> = list_items(raw)
                .filter_map(ConfigValue::as_object)
                .map(|obj| Value::Object(build_wire(children, obj)))
                .collect();
            (!(omit && items.is_empty())).then_some(Value::Array(items))
        }
        FieldKind::OneOf {
            discriminator_key,
            children,
        } => build_one_of(field, discriminator_key, children, raw).map(Value::Object),
    };

    if let Some(value) = value {
        set_at_path(out, field.effective_wire_path(), value);
    }
}

fn list_items(raw: Option<&ConfigValue>) -> impl Iterator<Item = &ConfigValue> {
    raw.and_then(ConfigValue::as_list)
        .unwrap_or_default()
        .iter()
        .filter(|v| v.is_known())
}

/// First variant of `children` populated in `outer`, in declaration order.
#[must_use]
pub fn populated_variant<'a>(
    children: &'static [FieldSpec],
    outer: &'a ConfigObject,
) -> Option<(&'static FieldSpec, &'a ConfigObject)> {
    children.iter().filter(|c| c.is_variant()).find_map(|child| {
        outer
            .get(child.config_key)
            .and_then(ConfigValue::block_object)
            .map(|obj| (child, obj))
    })
}

fn build_one_of(
    field: &FieldSpec,
    discriminator_key: &str,
    children: &'static [FieldSpec],
    raw: Option<&ConfigValue>,
) -> Option<Map<String, Value>> {
    let outer = raw.and_then(ConfigValue::block_object);
    let selected = outer.and_then(|o| populated_variant(children, o));
    if selected.is_none() && field.omit_if_zero {
        return None;
    }

    let mut built = Map::new();
    if let Some((variant, obj)) = selected {
        trace!(
            field = field.config_key,
            variant = variant.config_key,
            "building one-of variant"
        );
        built = build_wire(variant.children(), obj);
    }
    if let Some(outer) = outer {
        for common in children.iter().filter(|c| !c.is_variant()) {
            build_field(common, outer, &mut built);
        }
    }
    if let Some(value) = selected
        .and_then(|(variant, _)| variant.variant)
        .and_then(|d| d.injected_value())
    {
        built.insert(discriminator_key.to_string(), Value::String(value.to_string()));
    }
    Some(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DefaultValue, Discriminator};
    use serde_json::json;

    fn config(value: Value) -> ConfigObject {
        match ConfigValue::from(value) {
            ConfigValue::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    static LINK: &[FieldSpec] = &[
        FieldSpec::string("label"),
        FieldSpec::string("link"),
        FieldSpec::boolean("is_hidden").omit_if_zero(),
    ];

    #[test]
    fn test_scalars_write_zero_values_unless_omitted() {
        let fields = [
            FieldSpec::string("title"),
            FieldSpec::string("title_size").omit_if_zero(),
            FieldSpec::boolean("show_legend"),
            FieldSpec::int("precision").omit_if_zero(),
            FieldSpec::float("min"),
        ];
        let wire = build_wire(&fields, &config(json!({"title": null})));
        assert_eq!(
            Value::Object(wire),
            json!({"title": "", "show_legend": false, "min": 0.0})
        );
    }

    #[test]
    fn test_unset_scalar_takes_default() {
        let fields = [
            FieldSpec::boolean("has_padding").default_value(DefaultValue::Bool(true)),
            FieldSpec::string("sort").omit_if_zero().default_value(DefaultValue::String("desc")),
        ];
        let wire = build_wire(&fields, &ConfigObject::new());
        assert_eq!(Value::Object(wire), json!({"has_padding": true, "sort": "desc"}));
        let wire = build_wire(&fields, &config(json!({"has_padding": false, "sort": "asc"})));
        assert_eq!(Value::Object(wire), json!({"has_padding": false, "sort": "asc"}));
    }

    #[test]
    fn test_unknown_counts_as_unset() {
        let fields = [FieldSpec::string("title").omit_if_zero()];
        let mut obj = ConfigObject::new();
        obj.insert("title".into(), ConfigValue::Unknown);
        assert!(build_wire(&fields, &obj).is_empty());
    }

    #[test]
    fn test_lists_default_to_empty_arrays() {
        let fields = [
            FieldSpec::string_list("tags"),
            FieldSpec::int_list("ids"),
            FieldSpec::string_list("restricted_roles").omit_if_zero(),
        ];
        let wire = build_wire(&fields, &config(json!({"ids": [1, 2]})));
        assert_eq!(Value::Object(wire), json!({"tags": [], "ids": [1, 2]}));
    }

    #[test]
    fn test_wire_path_nests() {
        let fields = [FieldSpec::string("live_span").wire_path("time.live_span").omit_if_zero()];
        let wire = build_wire(&fields, &config(json!({"live_span": "1h"})));
        assert_eq!(Value::Object(wire), json!({"time": {"live_span": "1h"}}));
    }

    #[test]
    fn test_block_emits_object() {
        let fields = [FieldSpec::block("style", LINK).omit_if_zero()];
        let wire = build_wire(&fields, &config(json!({"style": [{"label": "x"}]})));
        assert_eq!(
            Value::Object(wire),
            json!({"style": {"label": "x", "link": ""}})
        );
        assert!(build_wire(&fields, &ConfigObject::new()).is_empty());
    }

    #[test]
    fn test_absent_block_without_omit_builds_from_empty() {
        let fields = [FieldSpec::block("style", LINK)];
        let wire = build_wire(&fields, &ConfigObject::new());
        assert_eq!(Value::Object(wire), json!({"style": {"label": "", "link": ""}}));
    }

    #[test]
    fn test_block_list_emits_array() {
        let fields = [FieldSpec::block_list("custom_link", LINK).wire_key("custom_links")];
        let wire = build_wire(
            &fields,
            &config(json!({"custom_link": [{"label": "a", "link": "b", "is_hidden": true}]})),
        );
        assert_eq!(
            Value::Object(wire),
            json!({"custom_links": [{"label": "a", "link": "b", "is_hidden": true}]})
        );
        let empty = build_wire(&fields, &ConfigObject::new());
        assert_eq!(Value::Object(empty), json!({"custom_links": []}));
    }

    #[test]
    fn test_schema_only_skipped() {
        let fields = [FieldSpec::int_list("dashboard_lists").schema_only()];
        assert!(build_wire(&fields, &config(json!({"dashboard_lists": [1]}))).is_empty());
    }

    static CANONICAL: &[FieldSpec] = &[
        FieldSpec::string("unit_name"),
        FieldSpec::string("per_unit_name").omit_if_zero(),
    ];
    static CUSTOM: &[FieldSpec] = &[FieldSpec::string("label")];
    static UNIT: &[FieldSpec] = &[
        FieldSpec::block("canonical", CANONICAL).variant(Discriminator::Exact("canonical_unit")),
        FieldSpec::block("custom", CUSTOM).variant(Discriminator::Exact("custom_unit_label")),
    ];

    #[test]
    fn test_one_of_injects_discriminator() {
        let fields = [FieldSpec::one_of("unit", "type", UNIT).omit_if_zero()];
        let wire = build_wire(
            &fields,
            &config(json!({"unit": [{"custom": [{"label": "req/s"}]}]})),
        );
        assert_eq!(
            Value::Object(wire),
            json!({"unit": {"type": "custom_unit_label", "label": "req/s"}})
        );
    }

    #[test]
    fn test_one_of_first_populated_variant_wins() {
        let fields = [FieldSpec::one_of("unit", "type", UNIT)];
        let wire = build_wire(
            &fields,
            &config(json!({"unit": [{
                "canonical": [{"unit_name": "byte"}],
                "custom": [{"label": "x"}]
            }]})),
        );
        assert_eq!(
            Value::Object(wire),
            json!({"unit": {"type": "canonical_unit", "unit_name": "byte"}})
        );
    }

    #[test]
    fn test_one_of_without_variant() {
        let omitted = [FieldSpec::one_of("unit", "type", UNIT).omit_if_zero()];
        assert!(build_wire(&omitted, &config(json!({"unit": [{}]}))).is_empty());
        let kept = [FieldSpec::one_of("unit", "type", UNIT)];
        let wire = build_wire(&kept, &config(json!({"unit": [{}]})));
        assert_eq!(Value::Object(wire), json!({"unit": {}}));
    }
}
