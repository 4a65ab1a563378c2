//! Request parts the request tables declare as schema only.
//!
//! Besides the formula `query` list of [`crate::queries`], two request fields
//! have wire shapes the engine cannot express. `sort.order_by` is a list of
//! formula or group sorts told apart by `type`, and the query table's
//! `text_formats` is a list of lists of rules.

use serde_json::{Map, Value};
use tfdash_mapping::build::populated_variant;
use tfdash_mapping::flatten::select_variant;
use tfdash_mapping::path::join;
use tfdash_mapping::{
    ConfigObject, ConfigValue, Discriminator, FieldSpec, ValidationError, WidgetSpec,
    build_wire, flatten_wire, set_at_path,
};
use tracing::trace;

use crate::error::Result;
use crate::fields::SORT_ORDERS;
use crate::queries::{
    build_request_queries, flatten_request_queries, objects, request_query_errors,
    response_format, variant_errors,
};

static FORMULA_SORT: &[FieldSpec] = &[
    FieldSpec::int("index")
        .required()
        .description("The index of the formula to sort by."),
    FieldSpec::string("order")
        .required()
        .valid_values(SORT_ORDERS)
        .description("Widget sorting methods."),
];

static GROUP_SORT: &[FieldSpec] = &[
    FieldSpec::string("name")
        .required()
        .description("The name of the group."),
    FieldSpec::string("order")
        .required()
        .valid_values(SORT_ORDERS)
        .description("Widget sorting methods."),
];

static ORDER_BY_BLOCKS: &[FieldSpec] = &[
    FieldSpec::block("formula_sort", FORMULA_SORT)
        .omit_if_zero()
        .description("The formula to sort the widget by."),
    FieldSpec::block("group_sort", GROUP_SORT)
        .omit_if_zero()
        .description("The group to sort the widget by."),
];

/// Kinds of one `sort.order_by` entry, keyed by the wire `type`.
pub static ORDER_BY_VARIANTS: &[FieldSpec] = &[
    FieldSpec::block("formula_sort", FORMULA_SORT).variant(Discriminator::Exact("formula")),
    FieldSpec::block("group_sort", GROUP_SORT).variant(Discriminator::Exact("group")),
];

/// One element of `sort.order_by`, as a union.
pub static ORDER_BY: FieldSpec = FieldSpec::one_of("order_by", "type", ORDER_BY_VARIANTS);

/// Sort options of a scalar formula request.
pub(crate) static WIDGET_SORT: &[FieldSpec] = &[
    FieldSpec::int("count")
        .omit_if_zero()
        .description("The number of items to limit the widget to."),
    FieldSpec::block_list("order_by", ORDER_BY_BLOCKS)
        .schema_only()
        .description("The array of items to sort the widget by in order."),
];

static TEXT_FORMAT_MATCH: &[FieldSpec] = &[
    FieldSpec::string("type")
        .required()
        .valid_values(&["is", "is_not", "contains", "does_not_contain", "starts_with", "ends_with"])
        .description("Match or compare option."),
    FieldSpec::string("value")
        .required()
        .description("Table widget match string."),
];

static TEXT_FORMAT_REPLACE: &[FieldSpec] = &[
    FieldSpec::string("type")
        .required()
        .valid_values(&["all", "substring"])
        .description("Table widget text format replace all type."),
    FieldSpec::string("with")
        .required()
        .description("Table widget match string."),
    FieldSpec::string("substring")
        .omit_if_zero()
        .description("Text that will be replaced. Must be used with type `substring`."),
];

/// One rule of a `text_format` list.
pub static TEXT_FORMAT_RULE: &[FieldSpec] = &[
    FieldSpec::block("match", TEXT_FORMAT_MATCH)
        .required()
        .description("Match rule for the table widget text format."),
    FieldSpec::string("palette")
        .omit_if_zero()
        .valid_values(&[
            "white_on_red",
            "white_on_yellow",
            "white_on_green",
            "black_on_light_red",
            "black_on_light_yellow",
            "black_on_light_green",
            "red_on_white",
            "yellow_on_white",
            "green_on_white",
            "custom_bg",
            "custom_text",
        ])
        .description("The color palette to apply."),
    FieldSpec::block("replace", TEXT_FORMAT_REPLACE)
        .omit_if_zero()
        .description("Replace rule for the table widget text format."),
    FieldSpec::string("custom_bg_color")
        .omit_if_zero()
        .description("The custom color palette to apply to the background."),
    FieldSpec::string("custom_fg_color")
        .omit_if_zero()
        .description("The custom color palette to apply to the foreground text."),
];

/// Children of one `text_formats` element.
pub(crate) static TEXT_FORMATS: &[FieldSpec] = &[FieldSpec::block_list(
    "text_format",
    TEXT_FORMAT_RULE,
)
.omit_if_zero()
.description("The text format to apply to the items in a table widget column.")];

fn request_fields(spec: &WidgetSpec) -> &'static [FieldSpec] {
    spec.fields
        .iter()
        .find(|f| f.config_key == "request")
        .map(FieldSpec::children)
        .unwrap_or_default()
}

fn declares(spec: &WidgetSpec, key: &str) -> bool {
    request_fields(spec).iter().any(|f| f.config_key == key)
}

/// Finish one built request of a `spec` widget: formula queries, sort order
/// and text formats, as far as the widget's request table has them.
pub(crate) fn build_request(spec: &WidgetSpec, request: &ConfigObject, out: &mut Map<String, Value>) {
    if let Some(format) = response_format(spec.wire_type) {
        build_request_queries(format, request, out);
    }
    if declares(spec, "sort") {
        build_sort_order(request, out);
    }
    if declares(spec, "text_formats") {
        build_text_formats(request, out);
    }
}

fn build_sort_order(request: &ConfigObject, out: &mut Map<String, Value>) {
    let Some(sort) = request
        .get("sort")
        .filter(|v| v.is_known())
        .and_then(ConfigValue::block_object)
    else {
        return;
    };
    let order_by: Vec<Value> = objects(sort, "order_by").filter_map(build_order_by).collect();
    if !order_by.is_empty() {
        set_at_path(out, "sort.order_by", Value::Array(order_by));
    }
}

/// Wire object of one `order_by` entry, `None` when no kind is populated.
#[must_use]
pub fn build_order_by(element: &ConfigObject) -> Option<Value> {
    let (variant, obj) = populated_variant(ORDER_BY_VARIANTS, element)?;
    let mut built = build_wire(variant.children(), obj);
    if let Some(kind) = variant.variant.and_then(Discriminator::injected_value) {
        built.insert("type".to_string(), Value::String(kind.to_string()));
    }
    Some(Value::Object(built))
}

fn build_text_formats(request: &ConfigObject, out: &mut Map<String, Value>) {
    let formats: Vec<Value> = objects(request, "text_formats")
        .map(|group| {
            Value::Array(
                objects(group, "text_format")
                    .map(|rule| Value::Object(build_wire(TEXT_FORMAT_RULE, rule)))
                    .collect(),
            )
        })
        .collect();
    if !formats.is_empty() {
        out.insert("text_formats".to_string(), Value::Array(formats));
    }
}

/// Flatten the schema-only parts of one wire request into `out`, the request
/// element the engine already flattened. `path` names the request in errors.
///
/// # Errors
///
/// Returns an error when a sort entry or a text format rule is not an
/// object, or one of their fields is malformed.
pub(crate) fn flatten_request(
    spec: &WidgetSpec,
    path: &str,
    wire: &Map<String, Value>,
    out: &mut ConfigObject,
) -> Result<()> {
    if response_format(spec.wire_type).is_some() {
        flatten_request_queries(wire, out)?;
    }
    if declares(spec, "sort") {
        flatten_sort_order(path, wire, out)?;
    }
    if declares(spec, "text_formats") {
        flatten_text_formats(path, wire, out)?;
    }
    Ok(())
}

fn flatten_sort_order(path: &str, wire: &Map<String, Value>, out: &mut ConfigObject) -> Result<()> {
    let Some(order_by) = wire
        .get("sort")
        .and_then(Value::as_object)
        .and_then(|sort| sort.get("order_by"))
        .filter(|v| !v.is_null())
    else {
        return Ok(());
    };
    let list_path = join(path, "sort.order_by");
    let mut elements = Vec::new();
    for (i, item) in array(&list_path, order_by)?.iter().enumerate() {
        let obj = object(&format!("{list_path}[{i}]"), item)?;
        let kind = obj.get("type").and_then(Value::as_str);
        let Some(variant) = select_variant(ORDER_BY_VARIANTS, kind) else {
            trace!(kind = ?kind, "skipping sort entry of unknown type");
            continue;
        };
        let mut element = ConfigObject::new();
        element.insert(
            variant.config_key.to_string(),
            ConfigValue::block(flatten_wire(variant.children(), obj)?),
        );
        elements.push(ConfigValue::Object(element));
    }
    if let Some(sort) = out.get_mut("sort").and_then(ConfigValue::block_object_mut) {
        sort.insert("order_by".to_string(), ConfigValue::List(elements));
    }
    Ok(())
}

fn flatten_text_formats(path: &str, wire: &Map<String, Value>, out: &mut ConfigObject) -> Result<()> {
    let Some(formats) = wire.get("text_formats").filter(|v| !v.is_null()) else {
        return Ok(());
    };
    let list_path = join(path, "text_formats");
    let mut groups = Vec::new();
    for (i, group) in array(&list_path, formats)?.iter().enumerate() {
        let group_path = format!("{list_path}[{i}]");
        let rules = array(&group_path, group)?
            .iter()
            .enumerate()
            .map(|(j, rule)| -> Result<ConfigValue> {
                let obj = object(&format!("{group_path}[{j}]"), rule)?;
                Ok(ConfigValue::Object(flatten_wire(TEXT_FORMAT_RULE, obj)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut element = ConfigObject::new();
        element.insert("text_format".to_string(), ConfigValue::List(rules));
        groups.push(ConfigValue::Object(element));
    }
    out.insert("text_formats".to_string(), ConfigValue::List(groups));
    Ok(())
}

fn array<'a>(path: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| tfdash_mapping::Error::malformed(path, "array", value).into())
}

fn object<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| tfdash_mapping::Error::malformed(path, "object", value).into())
}

/// Union problems of the schema-only lists of one request at `path`.
pub(crate) fn request_errors(
    spec: &WidgetSpec,
    path: &str,
    request: &ConfigObject,
) -> Vec<ValidationError> {
    let mut errors = request_query_errors(path, request);
    let sort = request
        .get("sort")
        .filter(|v| v.is_known())
        .and_then(ConfigValue::block_object);
    if let Some(sort) = sort.filter(|_| declares(spec, "sort")) {
        let list = join(path, "sort.order_by");
        errors.extend(
            objects(sort, "order_by")
                .enumerate()
                .flat_map(|(k, element)| variant_errors(&format!("{list}[{k}]"), ORDER_BY_VARIANTS, element)),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tfdash_mapping::{Error, ValidationErrorKind, check_fields};

    fn config(value: Value) -> ConfigObject {
        match ConfigValue::from(value) {
            ConfigValue::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    fn spec(wire_type: &str) -> &'static WidgetSpec {
        crate::widgets::by_wire_type(wire_type).unwrap()
    }

    #[test]
    fn test_request_tables_are_well_formed() {
        assert_eq!(check_fields(WIDGET_SORT), Vec::new());
        assert_eq!(check_fields(TEXT_FORMATS), Vec::new());
        assert_eq!(check_fields(std::slice::from_ref(&ORDER_BY)), Vec::new());
    }

    #[test]
    fn test_order_by_injects_type() {
        let formula = config(json!({"formula_sort": [{"index": 0, "order": "desc"}]}));
        assert_eq!(
            build_order_by(&formula),
            Some(json!({"type": "formula", "index": 0, "order": "desc"}))
        );
        let group = config(json!({"group_sort": [{"name": "host", "order": "asc"}]}));
        assert_eq!(
            build_order_by(&group),
            Some(json!({"type": "group", "name": "host", "order": "asc"}))
        );
        assert_eq!(build_order_by(&ConfigObject::new()), None);
    }

    #[test]
    fn test_sort_order_round_trip() {
        let toplist = spec("toplist");
        let request = config(json!({
            "sort": [{
                "count": 10,
                "order_by": [
                    {"formula_sort": [{"index": 1, "order": "asc"}]},
                    {"group_sort": [{"name": "service", "order": "desc"}]}
                ]
            }]
        }));
        let mut out = Map::new();
        out.insert("sort".to_string(), json!({"count": 10}));
        build_request(toplist, &request, &mut out);
        assert_eq!(
            Value::Object(out.clone()),
            json!({"sort": {"count": 10, "order_by": [
                {"type": "formula", "index": 1, "order": "asc"},
                {"type": "group", "name": "service", "order": "desc"}
            ]}})
        );

        let mut element = config(json!({"sort": [{"count": 10}]}));
        flatten_request(toplist, "request[0]", &out, &mut element).unwrap();
        let order_by = element["sort"].block_object().unwrap()["order_by"].as_list().unwrap();
        assert_eq!(order_by.len(), 2);
        assert_eq!(
            order_by[1].as_object().unwrap()["group_sort"].block_object().unwrap()["name"],
            ConfigValue::from("service")
        );
    }

    #[test]
    fn test_unknown_sort_type_is_skipped() {
        let wire = json!({"sort": {"order_by": [{"type": "future", "x": 1}, {"type": "formula", "index": 0, "order": "desc"}]}});
        let mut element = config(json!({"sort": [{}]}));
        flatten_request(spec("toplist"), "request[0]", wire.as_object().unwrap(), &mut element)
            .unwrap();
        let order_by = element["sort"].block_object().unwrap()["order_by"].as_list().unwrap();
        assert_eq!(order_by.len(), 1);
    }

    #[test]
    fn test_malformed_sort_and_text_formats() {
        let mut element = config(json!({"sort": [{}]}));
        let wire = json!({"sort": {"order_by": ["formula"]}});
        match flatten_request(spec("toplist"), "request[0]", wire.as_object().unwrap(), &mut element) {
            Err(crate::Error::Mapping(Error::MalformedWire { path, expected, .. })) => {
                assert_eq!(path, "request[0].sort.order_by[0]");
                assert_eq!(expected, "object");
            }
            other => panic!("unexpected {other:?}"),
        }

        let mut element = ConfigObject::new();
        let wire = json!({"text_formats": [[{"match": {"type": "is", "value": "a"}}], {"match": {}}]});
        match flatten_request(spec("query_table"), "request[2]", wire.as_object().unwrap(), &mut element) {
            Err(crate::Error::Mapping(Error::MalformedWire { path, expected, .. })) => {
                assert_eq!(path, "request[2].text_formats[1]");
                assert_eq!(expected, "array");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_text_formats_nest_rule_lists() {
        let query_table = spec("query_table");
        let request = config(json!({
            "text_formats": [
                {"text_format": [
                    {"match": [{"type": "is", "value": "test"}], "palette": "black_on_light_yellow",
                     "replace": [{"type": "all", "with": "test"}]},
                    {"match": [{"type": "is", "value": "versus"}]}
                ]},
                {"text_format": [
                    {"match": [{"type": "is", "value": "apple"}], "palette": "custom_bg", "custom_bg_color": "#632CA6"}
                ]}
            ]
        }));
        let mut out = Map::new();
        build_request(query_table, &request, &mut out);
        assert_eq!(
            out["text_formats"],
            json!([
                [
                    {"match": {"type": "is", "value": "test"}, "palette": "black_on_light_yellow",
                     "replace": {"type": "all", "with": "test"}},
                    {"match": {"type": "is", "value": "versus"}}
                ],
                [{"match": {"type": "is", "value": "apple"}, "palette": "custom_bg", "custom_bg_color": "#632CA6"}]
            ])
        );

        let mut element = ConfigObject::new();
        flatten_request(query_table, "request[0]", &out, &mut element).unwrap();
        let mut rebuilt = Map::new();
        build_request(query_table, &element, &mut rebuilt);
        assert_eq!(rebuilt, out);
    }

    #[test]
    fn test_sort_entries_need_one_kind() {
        let request = config(json!({
            "sort": [{"order_by": [
                {"formula_sort": [{"index": 0, "order": "desc"}], "group_sort": [{"name": "a", "order": "asc"}]},
                {}
            ]}]
        }));
        let errors = request_errors(spec("toplist"), "widget[0].toplist_definition[0].request[0]", &request);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind(), ValidationErrorKind::ConflictingVariants);
        assert_eq!(errors[1].kind(), ValidationErrorKind::MissingVariant);
        assert_eq!(
            errors[1].path(),
            "widget[0].toplist_definition[0].request[0].sort.order_by[1]"
        );
    }
}
