//! Dashboard-level build, flatten, schema and validation.
//!
//! Widgets are the one part of a dashboard the field tables cannot express on
//! their own: a widget is a union of definition blocks keyed by configuration
//! name on one side and by the definition's `type` on the other, and the group
//! widget nests further widgets. This module does that dispatch and leaves
//! everything else to the mapping engine.

use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use tfdash_mapping::path::join;
use tfdash_mapping::validate::collect_errors;
use tfdash_mapping::{
    Block, ConfigObject, ConfigValue, EngineConfig, Schema, ValidationError, ValidationErrors,
    Validator, WidgetSpec, build_field, build_wire, derive_schema_with, flatten_wire,
};

use crate::error::Result;
use crate::fields::{COMMON_WIDGET_FIELDS, DASHBOARD_FIELDS, WIDGET_CONTAINER};
use crate::queries::objects;
use crate::requests::{build_request, flatten_request, request_errors};
use crate::widgets::{GROUP_TYPE, WIDGETS, by_wire_type};

// =============================================================================
// Build
// =============================================================================

/// Build the wire body of a dashboard.
///
/// `id` is sent as the dashboard `id`; pass an empty string on create.
/// Widgets that populate no known definition build as null.
#[must_use]
#[instrument(name = "build_dashboard", skip_all, fields(id = id))]
pub fn build_dashboard(config: &ConfigObject, id: &str) -> Map<String, Value> {
    let mut body = build_wire(DASHBOARD_FIELDS, config);
    body.insert("id".to_string(), Value::String(id.to_string()));
    let widgets: Vec<Value> = objects(config, "widget")
        .map(|w| build_widget(w).map_or(Value::Null, Value::Object))
        .collect();
    debug!(widgets = widgets.len(), "built dashboard body");
    body.insert("widgets".to_string(), Value::Array(widgets));
    body
}

/// Build a dashboard body and serialise it as one line of JSON.
///
/// # Errors
///
/// Returns an error when serialisation fails.
pub fn marshal_dashboard(config: &ConfigObject, id: &str) -> Result<String> {
    let body = build_dashboard(config, id);
    let mut text = serde_json::to_string(&body)?;
    text.push('\n');
    Ok(text)
}

/// Build the wire object of one widget.
///
/// The first populated definition wins. Returns `None` when the widget
/// populates no definition at all.
#[must_use]
pub fn build_widget(widget: &ConfigObject) -> Option<Map<String, Value>> {
    let Some((spec, definition)) = populated_definition(widget, true) else {
        debug!("widget has no populated definition");
        return None;
    };
    trace!(widget = spec.wire_type, "building widget");
    let mut out = Map::new();
    out.insert(
        "definition".to_string(),
        Value::Object(build_definition(spec, definition)),
    );
    for field in WIDGET_CONTAINER {
        build_field(field, widget, &mut out);
    }
    Some(out)
}

fn populated_definition(
    widget: &ConfigObject,
    allow_group: bool,
) -> Option<(&'static WidgetSpec, &ConfigObject)> {
    WIDGETS
        .iter()
        .filter(|spec| allow_group || spec.wire_type != GROUP_TYPE)
        .find_map(|spec| {
            widget
                .get(spec.config_key)
                .filter(|v| v.is_known())
                .and_then(ConfigValue::block_object)
                .map(|definition| (spec, definition))
        })
}

fn build_definition(spec: &WidgetSpec, definition: &ConfigObject) -> Map<String, Value> {
    let mut out = build_wire(COMMON_WIDGET_FIELDS, definition);
    for field in spec.fields {
        build_field(field, definition, &mut out);
    }
    out.insert("type".to_string(), Value::String(spec.wire_type.to_string()));

    if let Some(Value::Array(requests)) = out.get_mut("requests") {
        for (request, wire) in objects(definition, "request").zip(requests.iter_mut()) {
            if let Value::Object(wire) = wire {
                build_request(spec, request, wire);
            }
        }
    }

    if spec.wire_type == GROUP_TYPE {
        let children: Vec<Value> = objects(definition, "widget")
            .map(|child| match populated_definition(child, false) {
                Some(_) => build_widget(child).map_or(Value::Null, Value::Object),
                None => Value::Object(Map::new()),
            })
            .collect();
        out.insert("widgets".to_string(), Value::Array(children));
    }
    out
}

// =============================================================================
// Flatten
// =============================================================================

/// Flatten a dashboard body returned by the API into configuration.
///
/// # Errors
///
/// Returns an error when a known field has the wrong shape.
#[instrument(name = "flatten_dashboard", skip_all)]
pub fn flatten_dashboard(wire: &Map<String, Value>) -> Result<ConfigObject> {
    let mut config = flatten_wire(DASHBOARD_FIELDS, wire)?;

    if let Some(url) = wire.get("url").and_then(Value::as_str) {
        config.insert("url".to_string(), ConfigValue::from(url));
    }
    config
        .entry("notify_list".to_string())
        .or_insert_with(|| ConfigValue::List(Vec::new()));

    let read_only = if wire.get("restricted_roles").is_some_and(Value::is_array) {
        false
    } else {
        wire.get("is_read_only")
            .and_then(Value::as_bool)
            .unwrap_or_default()
    };
    config.insert("is_read_only".to_string(), ConfigValue::Bool(read_only));

    prefer_list(&mut config, "template_variable", "defaults", "default");
    if let Some(ConfigValue::List(presets)) = config.get_mut("template_variable_preset") {
        for preset in presets {
            if let ConfigValue::Object(preset) = preset {
                prefer_list(preset, "template_variable", "values", "value");
            }
        }
    }

    let widgets = wire_widgets("widgets", wire)?;
    let flattened = flatten_widget_list("widgets", widgets)?;
    debug!(widgets = flattened.len(), "flattened dashboard body");
    config.insert("widget".to_string(), ConfigValue::List(flattened));
    Ok(config)
}

/// Drop the deprecated scalar `single` of every element of `key` that also
/// carries a non-empty `list`.
fn prefer_list(config: &mut ConfigObject, key: &str, list: &str, single: &str) {
    let Some(ConfigValue::List(elements)) = config.get_mut(key) else {
        return;
    };
    for element in elements {
        if let ConfigValue::Object(element) = element
            && element
                .get(list)
                .and_then(ConfigValue::as_list)
                .is_some_and(|items| !items.is_empty())
        {
            element.remove(single);
        }
    }
}

fn wire_widgets<'a>(path: &str, wire: &'a Map<String, Value>) -> Result<&'a [Value]> {
    match wire.get("widgets") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(tfdash_mapping::Error::malformed(path, "array", other).into()),
    }
}

fn flatten_widget_list(path: &str, widgets: &[Value]) -> Result<Vec<ConfigValue>> {
    widgets
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let item_path = format!("{path}[{i}]");
            let obj = w
                .as_object()
                .ok_or_else(|| tfdash_mapping::Error::malformed(&item_path, "object", w))?;
            Ok(ConfigValue::Object(
                flatten_widget_at(&item_path, obj)?.unwrap_or_default(),
            ))
        })
        .collect()
}

/// Flatten one wire widget into configuration.
///
/// Returns `None` for definitions of an unknown `type`.
///
/// # Errors
///
/// Returns an error when a known field has the wrong shape, or when the
/// widget has no object `definition`.
///
/// Inside a dashboard every entry of `widgets` must be an object; the error
/// path names the offending entry, e.g. `widgets[2].definition`.
pub fn flatten_widget(wire: &Map<String, Value>) -> Result<Option<ConfigObject>> {
    flatten_widget_at("", wire)
}

fn flatten_widget_at(path: &str, wire: &Map<String, Value>) -> Result<Option<ConfigObject>> {
    let definition_path = join(path, "definition");
    let definition = match wire.get("definition") {
        Some(Value::Object(definition)) => definition,
        other => {
            let found = other.unwrap_or(&Value::Null);
            return Err(
                tfdash_mapping::Error::malformed(&definition_path, "object", found).into(),
            );
        }
    };
    let wire_type = definition
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let Some(spec) = by_wire_type(wire_type) else {
        debug!(widget = wire_type, "skipping widget of unknown type");
        return Ok(None);
    };

    let mut def = flatten_wire(COMMON_WIDGET_FIELDS, definition)?;
    def.extend(flatten_wire(spec.fields, definition)?);

    if let Some(requests) = definition.get("requests").and_then(Value::as_array)
        && let Some(ConfigValue::List(elements)) = def.get_mut("request")
    {
        for (i, (element, request)) in elements.iter_mut().zip(requests).enumerate() {
            if let (ConfigValue::Object(element), Some(request)) = (element, request.as_object()) {
                flatten_request(spec, &format!("request[{i}]"), request, element)?;
            }
        }
    }

    if spec.wire_type == GROUP_TYPE {
        let children_path = join(&definition_path, "widgets");
        let children = wire_widgets(&children_path, definition)?;
        def.insert(
            "widget".to_string(),
            ConfigValue::List(flatten_widget_list(&children_path, children)?),
        );
    }

    let mut widget = flatten_wire(WIDGET_CONTAINER, wire)?;
    if !widget.contains_key("id")
        && let Some(id) = definition.get("id").and_then(Value::as_i64)
    {
        widget.insert("id".to_string(), ConfigValue::Int(id));
    }
    widget.insert(spec.config_key.to_string(), ConfigValue::block(def));
    Ok(Some(widget))
}

// =============================================================================
// Schema
// =============================================================================

/// Schema of the whole dashboard resource, widgets included.
#[must_use]
#[instrument(name = "dashboard_schema", skip_all)]
pub fn dashboard_schema(config: &EngineConfig) -> Schema {
    let mut schema = derive_schema_with(config, DASHBOARD_FIELDS);
    schema.blocks.insert(
        "widget".to_string(),
        widget_block(config, true, "The list of widgets to display on the dashboard."),
    );
    schema
}

/// Schema of one widget definition block.
#[must_use]
pub fn definition_schema(config: &EngineConfig, spec: &WidgetSpec) -> Schema {
    let mut nested = derive_schema_with(config, COMMON_WIDGET_FIELDS);
    nested.extend(derive_schema_with(config, spec.fields));
    if spec.wire_type == GROUP_TYPE {
        nested.blocks.insert(
            "widget".to_string(),
            widget_block(config, false, "The list of widgets in this group."),
        );
    }
    nested
}

fn widget_block(config: &EngineConfig, allow_group: bool, description: &str) -> Block {
    let mut nested = derive_schema_with(config, WIDGET_CONTAINER);
    let mut variants = Vec::new();
    for spec in WIDGETS
        .iter()
        .filter(|spec| allow_group || spec.wire_type != GROUP_TYPE)
    {
        variants.push(spec.config_key.to_string());
        nested.blocks.insert(
            spec.config_key.to_string(),
            Block {
                description: spec.description.to_string(),
                deprecation_message: None,
                validators: vec![Validator::SizeAtMost { max: 1 }],
                plan_modifiers: Vec::new(),
                nested: definition_schema(config, spec),
            },
        );
    }
    Block {
        description: description.to_string(),
        deprecation_message: None,
        validators: vec![Validator::ExactlyOneVariant { variants }],
        plan_modifiers: Vec::new(),
        nested,
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a dashboard configuration, widgets included.
///
/// # Errors
///
/// Returns every problem found, with paths such as
/// `widget[2].note_definition.content`.
#[instrument(name = "validate_dashboard", skip_all)]
pub fn validate_dashboard(
    config: &EngineConfig,
    dashboard: &ConfigObject,
) -> std::result::Result<(), ValidationErrors> {
    let mut errors = collect_errors(config, "", DASHBOARD_FIELDS, dashboard);
    for (i, widget) in objects(dashboard, "widget").enumerate() {
        widget_errors(config, &format!("widget[{i}]"), widget, true, &mut errors);
    }
    if !errors.is_empty() {
        debug!(count = errors.len(), "dashboard failed validation");
    }
    ValidationErrors::into_result(errors)
}

fn widget_errors(
    config: &EngineConfig,
    path: &str,
    widget: &ConfigObject,
    allow_group: bool,
    errors: &mut Vec<ValidationError>,
) {
    errors.extend(collect_errors(config, path, WIDGET_CONTAINER, widget));

    let candidates = || {
        WIDGETS
            .iter()
            .filter(move |spec| allow_group || spec.wire_type != GROUP_TYPE)
    };
    let populated: Vec<(&WidgetSpec, &ConfigObject)> = candidates()
        .filter_map(|spec| {
            widget
                .get(spec.config_key)
                .filter(|v| v.is_known())
                .and_then(ConfigValue::block_object)
                .map(|definition| (spec, definition))
        })
        .collect();
    let pending = candidates()
        .any(|spec| matches!(widget.get(spec.config_key), Some(ConfigValue::Unknown)));

    match populated.len() {
        1 => {}
        0 if pending => {}
        0 => errors.push(ValidationError::MissingVariant {
            path: path.to_string(),
            variants: candidates().map(|s| s.config_key.to_string()).collect(),
        }),
        _ => errors.push(ValidationError::ConflictingVariants {
            path: path.to_string(),
            variants: populated
                .iter()
                .map(|(spec, _)| spec.config_key.to_string())
                .collect(),
        }),
    }

    for (spec, definition) in populated {
        let def_path = join(path, spec.config_key);
        errors.extend(collect_errors(config, &def_path, COMMON_WIDGET_FIELDS, definition));
        errors.extend(collect_errors(config, &def_path, spec.fields, definition));
        for (j, request) in objects(definition, "request").enumerate() {
            errors.extend(request_errors(spec, &format!("{def_path}.request[{j}]"), request));
        }
        if spec.wire_type == GROUP_TYPE {
            for (k, child) in objects(definition, "widget").enumerate() {
                widget_errors(config, &format!("{def_path}.widget[{k}]"), child, false, errors);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tfdash_mapping::ValidationErrorKind;

    fn config(value: Value) -> ConfigObject {
        match ConfigValue::from(value) {
            ConfigValue::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    fn wire(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_note_widget_takes_padding_default() {
        let widget = config(json!({
            "note_definition": [{"content": "hello"}]
        }));
        let built = build_widget(&widget).unwrap();
        assert_eq!(built["definition"]["type"], json!("note"));
        assert_eq!(built["definition"]["content"], json!("hello"));
        assert_eq!(built["definition"]["has_padding"], json!(true));
        assert!(!built.contains_key("id"));
    }

    #[test]
    fn test_widget_layout_and_id_on_container() {
        let widget = config(json!({
            "id": 7,
            "widget_layout": [{"x": 0, "y": 2, "width": 4, "height": 3}],
            "free_text_definition": [{"text": "hi"}]
        }));
        let built = build_widget(&widget).unwrap();
        assert_eq!(built["id"], json!(7));
        assert_eq!(
            built["layout"],
            json!({"x": 0, "y": 2, "width": 4, "height": 3})
        );
        assert_eq!(built["definition"]["type"], json!("free_text"));
    }

    #[test]
    fn test_widget_without_definition_builds_nothing() {
        assert!(build_widget(&ConfigObject::new()).is_none());
        let body = build_dashboard(
            &config(json!({"title": "T", "layout_type": "ordered", "widget": [{}]})),
            "",
        );
        assert_eq!(body["widgets"], json!([null]));
    }

    #[test]
    fn test_dashboard_body_carries_id_and_zero_values() {
        let body = build_dashboard(
            &config(json!({"title": "T", "layout_type": "ordered"})),
            "abc-123",
        );
        assert_eq!(body["id"], json!("abc-123"));
        assert_eq!(body["description"], json!(""));
        assert_eq!(body["notify_list"], json!([]));
        assert_eq!(body["template_variables"], json!([]));
        assert!(!body.contains_key("is_read_only"));
        assert!(!body.contains_key("url"));
    }

    #[test]
    fn test_group_widget_nests_children() {
        let widget = config(json!({
            "group_definition": [{
                "layout_type": "ordered",
                "title": "G",
                "widget": [
                    {"note_definition": [{"content": "inner"}]},
                    {}
                ]
            }]
        }));
        let built = build_widget(&widget).unwrap();
        let definition = &built["definition"];
        assert_eq!(definition["type"], json!("group"));
        assert_eq!(definition["show_title"], json!(true));
        assert_eq!(definition["widgets"][0]["definition"]["content"], json!("inner"));
        assert_eq!(definition["widgets"][1], json!({}));
    }

    #[test]
    fn test_formula_request_sets_response_format() {
        let widget = config(json!({
            "timeseries_definition": [{
                "request": [{
                    "formula": [{"formula_expression": "q1 * 2"}],
                    "query": [{"metric_query": [{"name": "q1", "query": "avg:cpu{*}"}]}]
                }]
            }]
        }));
        let built = build_widget(&widget).unwrap();
        let request = &built["definition"]["requests"][0];
        assert_eq!(request["response_format"], json!("timeseries"));
        assert_eq!(request["formulas"], json!([{"formula": "q1 * 2"}]));
        assert_eq!(
            request["queries"],
            json!([{"data_source": "metrics", "name": "q1", "query": "avg:cpu{*}"}])
        );
        assert!(request.get("query").is_none());
    }

    fn round_trip(widget: &ConfigObject) -> Map<String, Value> {
        let built = build_widget(widget).unwrap();
        let flattened = flatten_widget(&built).unwrap().unwrap();
        assert_eq!(build_widget(&flattened).unwrap(), built);
        built
    }

    #[test]
    fn test_toplist_sorts_formula_requests() {
        let widget = config(json!({
            "toplist_definition": [{
                "title": "Top hosts",
                "style": [{"display": [{"type": "stacked"}], "palette": "dog_classic"}],
                "request": [{
                    "query": [{"metric_query": [{"name": "q1", "query": "avg:cpu{*} by {host}"}]}],
                    "formula": [{"formula_expression": "q1"}],
                    "sort": [{
                        "count": 10,
                        "order_by": [
                            {"formula_sort": [{"index": 0, "order": "desc"}]},
                            {"group_sort": [{"name": "host", "order": "asc"}]}
                        ]
                    }]
                }]
            }]
        }));
        let built = round_trip(&widget);
        let definition = &built["definition"];
        assert_eq!(definition["type"], json!("toplist"));
        assert_eq!(definition["style"]["display"], json!({"type": "stacked"}));
        let request = &definition["requests"][0];
        assert_eq!(request["response_format"], json!("scalar"));
        assert_eq!(
            request["sort"],
            json!({"count": 10, "order_by": [
                {"type": "formula", "index": 0, "order": "desc"},
                {"type": "group", "name": "host", "order": "asc"}
            ]})
        );
    }

    #[test]
    fn test_change_request_emits_flags() {
        let widget = config(json!({
            "change_definition": [{
                "request": [{
                    "q": "avg:system.load.1{*}",
                    "change_type": "absolute",
                    "compare_to": "week_before",
                    "order_by": "name",
                    "order_dir": "desc"
                }]
            }]
        }));
        let built = round_trip(&widget);
        let request = &built["definition"]["requests"][0];
        assert_eq!(request["increase_good"], json!(false));
        assert_eq!(request["show_present"], json!(false));
        assert_eq!(request["compare_to"], json!("week_before"));
        assert!(request.get("response_format").is_none());
        assert!(request.get("sort").is_none());

        let formula = config(json!({
            "change_definition": [{
                "request": [{
                    "query": [{"metric_query": [{"name": "a", "query": "sum:hits{*}"}]}],
                    "formula": [{"formula_expression": "a"}],
                    "increase_good": true
                }]
            }]
        }));
        let built = round_trip(&formula);
        let request = &built["definition"]["requests"][0];
        assert_eq!(request["response_format"], json!("scalar"));
        assert_eq!(request["increase_good"], json!(true));
    }

    #[test]
    fn test_distribution_axes_and_apm_stats() {
        let widget = config(json!({
            "distribution_definition": [{
                "legend_size": "2",
                "xaxis": [{"scale": "linear", "include_zero": false}],
                "yaxis": [{"max": "100", "label": "count", "include_zero": true}],
                "request": [{
                    "apm_stats_query": [{
                        "service": "web",
                        "name": "rack.request",
                        "env": "prod",
                        "primary_tag": "datacenter:*",
                        "row_type": "resource",
                        "columns": [{"name": "hits", "order": "desc"}]
                    }],
                    "style": [{"palette": "warm"}]
                }]
            }]
        }));
        let built = round_trip(&widget);
        let definition = &built["definition"];
        assert_eq!(definition["show_legend"], json!(false));
        assert_eq!(definition["xaxis"], json!({"scale": "linear"}));
        assert_eq!(
            definition["yaxis"],
            json!({"max": "100", "label": "count", "include_zero": true})
        );
        let request = &definition["requests"][0];
        assert_eq!(request["apm_stats_query"]["row_type"], json!("resource"));
        assert_eq!(request["apm_stats_query"]["columns"], json!([{"name": "hits", "order": "desc"}]));
        assert!(request.get("response_format").is_none());
    }

    #[test]
    fn test_geomap_builds_style_and_view() {
        let widget = config(json!({
            "geomap_definition": [{
                "style": [{"palette": "hostmap_blues", "palette_flip": false}],
                "view": [{"focus": "WORLD"}],
                "request": [{
                    "query": [{"event_query": [{
                        "data_source": "rum",
                        "name": "q1",
                        "compute": [{"aggregation": "count"}],
                        "group_by": [{"facet": "@geo.country_iso_code", "limit": 250}]
                    }]}],
                    "formula": [{"formula_expression": "q1"}],
                    "sort": [{"count": 250, "order_by": [{"formula_sort": [{"index": 0, "order": "desc"}]}]}]
                }]
            }]
        }));
        let built = round_trip(&widget);
        let definition = &built["definition"];
        assert_eq!(
            definition["style"],
            json!({"palette": "hostmap_blues", "palette_flip": false})
        );
        assert_eq!(definition["view"], json!({"focus": "WORLD"}));
        let request = &definition["requests"][0];
        assert_eq!(request["queries"][0]["data_source"], json!("rum"));
        assert_eq!(request["sort"]["order_by"][0]["type"], json!("formula"));
    }

    #[test]
    fn test_treemap_colors_by_user() {
        let widget = config(json!({
            "treemap_definition": [{
                "title": "Memory",
                "request": [{
                    "query": [{"metric_query": [{"name": "m", "query": "sum:mem{*} by {service}"}]}],
                    "formula": [{"formula_expression": "m"}]
                }]
            }]
        }));
        let built = round_trip(&widget);
        let definition = &built["definition"];
        assert_eq!(definition["color_by"], json!("user"));
        assert_eq!(definition["requests"][0]["response_format"], json!("scalar"));
        assert_eq!(definition["requests"][0]["formulas"], json!([{"formula": "m"}]));
    }

    #[test]
    fn test_query_table_text_formats_and_formulas() {
        let widget = config(json!({
            "query_table_definition": [{
                "has_search_bar": "auto",
                "request": [
                    {
                        "q": "avg:system.cpu.user{account:prod} by {service, team}",
                        "aggregator": "max",
                        "limit": 25,
                        "order": "desc",
                        "cell_display_mode": ["number"],
                        "text_formats": [
                            {"text_format": [
                                {
                                    "match": [{"type": "is", "value": "test"}],
                                    "palette": "black_on_light_yellow",
                                    "replace": [{"type": "all", "with": "test"}]
                                },
                                {"match": [{"type": "is", "value": "versus"}]}
                            ]},
                            {"text_format": [{
                                "match": [{"type": "is", "value": "orange"}],
                                "palette": "custom_text",
                                "custom_fg_color": "#632CA6"
                            }]}
                        ]
                    },
                    {
                        "query": [{"metric_query": [{"name": "q", "query": "avg:cpu{*} by {host}"}]}],
                        "formula": [{"formula_expression": "q", "cell_display_mode": "bar"}]
                    }
                ]
            }]
        }));
        let built = round_trip(&widget);
        let definition = &built["definition"];
        assert_eq!(definition["has_search_bar"], json!("auto"));
        let legacy = &definition["requests"][0];
        assert_eq!(legacy["cell_display_mode"], json!(["number"]));
        assert_eq!(
            legacy["text_formats"][0][0],
            json!({
                "match": {"type": "is", "value": "test"},
                "palette": "black_on_light_yellow",
                "replace": {"type": "all", "with": "test"}
            })
        );
        assert_eq!(legacy["text_formats"][1][0]["custom_fg_color"], json!("#632CA6"));
        assert!(legacy.get("response_format").is_none());

        let formula = &definition["requests"][1];
        assert_eq!(formula["response_format"], json!("scalar"));
        assert_eq!(formula["formulas"][0]["cell_display_mode"], json!("bar"));
        assert!(formula.get("text_formats").is_none());
    }

    #[test]
    fn test_malformed_text_format_names_request() {
        let widget = wire(json!({
            "definition": {
                "type": "query_table",
                "requests": [{"q": "a"}, {"q": "b", "text_formats": [[{"match": {"type": "is", "value": "x"}}, "bold"]]}]
            }
        }));
        match flatten_widget(&widget) {
            Err(crate::Error::Mapping(tfdash_mapping::Error::MalformedWire { path, .. })) => {
                assert_eq!(path, "request[1].text_formats[0][1]");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validate_sort_entries() {
        let dashboard = config(json!({
            "title": "T",
            "layout_type": "ordered",
            "widget": [{
                "toplist_definition": [{
                    "request": [{"sort": [{"order_by": [{}, {"group_sort": [{"name": "host"}]}]}]}]
                }]
            }]
        }));
        let errors = validate_dashboard(&EngineConfig::default(), &dashboard).unwrap_err();
        let found: Vec<(ValidationErrorKind, &str)> =
            errors.errors.iter().map(|e| (e.kind(), e.path())).collect();
        assert!(found.contains(&(
            ValidationErrorKind::MissingVariant,
            "widget[0].toplist_definition.request[0].sort.order_by[0]"
        )));
        assert!(found.iter().any(|(kind, path)| {
            *kind == ValidationErrorKind::MissingRequired
                && path.ends_with("sort.order_by[1].group_sort.order")
        }));
    }

    #[test]
    fn test_marshal_ends_with_newline() {
        let text = marshal_dashboard(
            &config(json!({"title": "T", "layout_type": "free"})),
            "",
        )
        .unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
    }

    #[test]
    fn test_unknown_widget_type_flattens_to_none() {
        let widget = wire(json!({"definition": {"type": "hologram"}}));
        assert!(flatten_widget(&widget).unwrap().is_none());

        let body = wire(json!({
            "title": "T",
            "layout_type": "ordered",
            "widgets": [{"definition": {"type": "hologram"}}]
        }));
        let flattened = flatten_dashboard(&body).unwrap();
        assert_eq!(
            flattened["widget"],
            ConfigValue::List(vec![ConfigValue::Object(ConfigObject::new())])
        );
    }

    #[test]
    fn test_widget_without_definition_is_rejected() {
        assert!(flatten_widget(&wire(json!({"id": 1}))).is_err());
    }

    fn malformed_path(body: Value) -> String {
        match flatten_dashboard(&wire(body)) {
            Err(crate::Error::Mapping(tfdash_mapping::Error::MalformedWire { path, .. })) => path,
            other => panic!("expected a malformed wire error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_widget_entries_name_their_position() {
        let note = json!({"definition": {"type": "note", "content": "x"}});
        assert_eq!(
            malformed_path(json!({"title": "T", "widgets": [note.clone(), "oops"]})),
            "widgets[1]"
        );
        assert_eq!(
            malformed_path(json!({"title": "T", "widgets": [note, {"id": 3}]})),
            "widgets[1].definition"
        );
        assert_eq!(
            malformed_path(json!({"title": "T", "widgets": {"a": 1}})),
            "widgets"
        );
        assert_eq!(
            malformed_path(json!({"title": "T", "widgets": [{"definition": {
                "type": "group",
                "layout_type": "ordered",
                "widgets": [7]
            }}]})),
            "widgets[0].definition.widgets[0]"
        );
    }

    #[test]
    fn test_flatten_dashboard_read_only_and_url() {
        let body = wire(json!({
            "title": "T",
            "layout_type": "ordered",
            "url": "/dashboard/abc",
            "is_read_only": true,
            "restricted_roles": ["r1"]
        }));
        let flattened = flatten_dashboard(&body).unwrap();
        assert_eq!(flattened["url"], ConfigValue::from("/dashboard/abc"));
        assert_eq!(flattened["is_read_only"], ConfigValue::Bool(false));
        assert_eq!(flattened["notify_list"], ConfigValue::List(Vec::new()));
        assert_eq!(flattened["widget"], ConfigValue::List(Vec::new()));
    }

    #[test]
    fn test_flatten_prefers_list_defaults() {
        let body = wire(json!({
            "title": "T",
            "layout_type": "ordered",
            "template_variables": [
                {"name": "env", "default": "prod", "defaults": ["prod", "staging"]},
                {"name": "host", "default": "a"}
            ]
        }));
        let flattened = flatten_dashboard(&body).unwrap();
        let variables = flattened["template_variable"].as_list().unwrap();
        let first = variables[0].as_object().unwrap();
        assert!(!first.contains_key("default"));
        let second = variables[1].as_object().unwrap();
        assert_eq!(second["default"], ConfigValue::from("a"));
    }

    #[test]
    fn test_widget_id_falls_back_to_definition_id() {
        let widget = wire(json!({"definition": {"type": "note", "content": "x", "id": 42}}));
        let flattened = flatten_widget(&widget).unwrap().unwrap();
        assert_eq!(flattened["id"], ConfigValue::Int(42));
        assert!(flattened.contains_key("note_definition"));
    }

    #[test]
    fn test_sunburst_legend_round_trip() {
        let widget = config(json!({
            "sunburst_definition": [{
                "legend": [{"legend_table": [{"type": "table"}]}],
                "request": []
            }]
        }));
        let built = build_widget(&widget).unwrap();
        assert_eq!(built["definition"]["legend"], json!({"type": "table"}));

        let flattened = flatten_widget(&built).unwrap().unwrap();
        let definition = flattened["sunburst_definition"].block_object().unwrap();
        let legend = definition["legend"].block_object().unwrap();
        assert!(legend.contains_key("legend_table"));
    }

    #[test]
    fn test_schema_lists_widget_definitions() {
        let schema = dashboard_schema(&EngineConfig::default());
        let widget = &schema.blocks["widget"];
        assert!(widget.nested.contains("note_definition"));
        assert!(widget.nested.contains("group_definition"));
        assert!(widget.nested.contains("widget_layout"));
        let group = &widget.nested.blocks["group_definition"].nested;
        let inner = &group.blocks["widget"];
        assert!(inner.nested.contains("note_definition"));
        assert!(!inner.nested.contains("group_definition"));
    }

    #[test]
    fn test_validate_reports_widget_paths() {
        let dashboard = config(json!({
            "title": "T",
            "layout_type": "ordered",
            "widget": [
                {"note_definition": [{"content": ""}]},
                {},
                {
                    "note_definition": [{"content": "a"}],
                    "free_text_definition": [{"text": "b"}]
                }
            ]
        }));
        let errors = validate_dashboard(&EngineConfig::default(), &dashboard).unwrap_err();
        let found: Vec<(ValidationErrorKind, &str)> =
            errors.errors.iter().map(|e| (e.kind(), e.path())).collect();
        assert!(found.contains(&(ValidationErrorKind::Custom, "widget[0].note_definition.content")));
        assert!(found.contains(&(ValidationErrorKind::MissingVariant, "widget[1]")));
        assert!(found.contains(&(ValidationErrorKind::ConflictingVariants, "widget[2]")));
    }

    #[test]
    fn test_validate_unknown_definition_is_pending() {
        let dashboard = config(json!({"title": "T", "layout_type": "ordered"}));
        let mut dashboard = dashboard;
        let mut widget = ConfigObject::new();
        widget.insert("note_definition".to_string(), ConfigValue::Unknown);
        dashboard.insert(
            "widget".to_string(),
            ConfigValue::List(vec![ConfigValue::Object(widget)]),
        );
        assert!(validate_dashboard(&EngineConfig::default(), &dashboard).is_ok());
    }
}
