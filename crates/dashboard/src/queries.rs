//! Formula and function queries.
//!
//! A request's `query` list holds one union per element: exactly one of
//! `metric_query`, `event_query`, ... is set, and the wire object tells them
//! apart by `data_source`. The engine handles one-of fields but not lists of
//! them, so requests declare the list as schema only and the functions here
//! build, flatten and validate its elements against [`QUERY`].

use serde_json::{Map, Value};
use tfdash_mapping::build::populated_variant;
use tfdash_mapping::flatten::{discriminator_value, select_variant};
use tfdash_mapping::path::join;
use tfdash_mapping::{
    ConfigObject, ConfigValue, DefaultValue, Discriminator, FieldSpec, ValidationError,
    build_wire, flatten_wire,
};
use tracing::trace;

use crate::error::Result;
use crate::fields::{AGGREGATORS, SORT_ORDERS};

const EVENT_DATA_SOURCES: &[&str] = &[
    "logs",
    "spans",
    "network",
    "rum",
    "security_signals",
    "profiles",
    "audit",
    "events",
    "ci_tests",
    "ci_pipelines",
    "incident_analytics",
    "database_queries",
];

const EVENT_AGGREGATIONS: &[&str] = &[
    "count",
    "cardinality",
    "median",
    "pc75",
    "pc90",
    "pc95",
    "pc98",
    "pc99",
    "sum",
    "min",
    "max",
    "avg",
];

const CROSS_ORG_UUIDS: FieldSpec = FieldSpec::string_list("cross_org_uuids")
    .omit_if_zero()
    .max_items(1)
    .description("The source organization UUID for cross organization queries. Feature in Private Beta.");

static METRIC_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .default_value(DefaultValue::String("metrics"))
        .description("The data source for metrics queries."),
    FieldSpec::string("query")
        .required()
        .description("The metrics query definition."),
    FieldSpec::string("aggregator")
        .omit_if_zero()
        .valid_values(AGGREGATORS)
        .description("The aggregation methods available for metrics queries."),
    FieldSpec::string("name")
        .required()
        .description("The name of the query for use in formulas."),
    CROSS_ORG_UUIDS,
    FieldSpec::string("semantic_mode")
        .omit_if_zero()
        .description("Semantic mode for metrics queries."),
];

static EVENT_COMPUTE: &[FieldSpec] = &[
    FieldSpec::string("aggregation")
        .required()
        .valid_values(EVENT_AGGREGATIONS)
        .description("The aggregation methods for event platform queries."),
    FieldSpec::int("interval")
        .omit_if_zero()
        .description("A time interval in milliseconds."),
    FieldSpec::string("metric")
        .omit_if_zero()
        .description("The measurable attribute to compute."),
];

static EVENT_GROUP_BY_SORT: &[FieldSpec] = &[
    FieldSpec::string("aggregation")
        .required()
        .valid_values(EVENT_AGGREGATIONS)
        .description("The aggregation methods for the event platform queries."),
    FieldSpec::string("metric")
        .omit_if_zero()
        .description("The metric used for sorting group by results."),
    FieldSpec::string("order")
        .omit_if_zero()
        .valid_values(SORT_ORDERS)
        .description("Direction of sort."),
];

static EVENT_GROUP_BY: &[FieldSpec] = &[
    FieldSpec::string("facet")
        .required()
        .description("The event facet."),
    FieldSpec::int("limit")
        .omit_if_zero()
        .description("The number of groups to return."),
    FieldSpec::block("sort", EVENT_GROUP_BY_SORT)
        .omit_if_zero()
        .description("The options for sorting group by results."),
];

static EVENT_SEARCH: &[FieldSpec] = &[FieldSpec::string("query")
    .required()
    .description("The events search string.")];

static EVENT_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .required()
        .valid_values(EVENT_DATA_SOURCES)
        .description("The data source for event platform-based queries."),
    FieldSpec::string("storage")
        .omit_if_zero()
        .description("Storage location (private beta)."),
    FieldSpec::block("search", EVENT_SEARCH)
        .omit_if_zero()
        .description("The search options."),
    FieldSpec::string_list("indexes")
        .omit_if_zero()
        .description("An array of index names to query in the stream."),
    CROSS_ORG_UUIDS,
    FieldSpec::block_list("compute", EVENT_COMPUTE)
        .required()
        .description("The compute options."),
    FieldSpec::block_list("group_by", EVENT_GROUP_BY)
        .omit_if_zero()
        .description("Group by options."),
    FieldSpec::string("name")
        .required()
        .description("The name of query for use in formulas."),
];

static PROCESS_QUERY: &[FieldSpec] = &[
    CROSS_ORG_UUIDS,
    FieldSpec::string("data_source")
        .required()
        .valid_values(&["process", "container"])
        .description("The data source for process queries."),
    FieldSpec::string("metric")
        .required()
        .description("The process metric name."),
    FieldSpec::string("text_filter")
        .omit_if_zero()
        .description("The text to use as a filter."),
    FieldSpec::string_list("tag_filters")
        .omit_if_zero()
        .description("An array of tags to filter by."),
    FieldSpec::int("limit")
        .omit_if_zero()
        .description("The number of hits to return."),
    FieldSpec::string("sort")
        .default_value(DefaultValue::String("desc"))
        .valid_values(SORT_ORDERS)
        .description("The direction of the sort."),
    FieldSpec::string("aggregator")
        .omit_if_zero()
        .valid_values(AGGREGATORS)
        .description("The aggregation methods available for metrics queries."),
    FieldSpec::boolean("is_normalized_cpu")
        .omit_if_zero()
        .description("Whether to normalize the CPU percentages."),
    FieldSpec::string("name")
        .required()
        .description("The name of query for use in formulas."),
];

static APM_DEPENDENCY_STATS_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .required()
        .valid_values(&["apm_dependency_stats"])
        .description("The data source for APM Dependency Stats queries."),
    CROSS_ORG_UUIDS,
    FieldSpec::string("env")
        .required()
        .description("APM environment."),
    FieldSpec::string("stat")
        .required()
        .valid_values(&[
            "avg_duration",
            "avg_root_duration",
            "avg_spans_per_trace",
            "error_rate",
            "pct_exec_time",
            "pct_of_traces",
            "total_traces_count",
        ])
        .description("APM statistic."),
    FieldSpec::string("operation_name")
        .required()
        .description("Name of operation on service."),
    FieldSpec::string("resource_name")
        .required()
        .description("APM resource."),
    FieldSpec::string("service")
        .required()
        .description("APM service."),
    FieldSpec::string("primary_tag_name")
        .omit_if_zero()
        .description("The name of the second primary tag used within APM."),
    FieldSpec::string("primary_tag_value")
        .omit_if_zero()
        .description("Filter APM data by the second primary tag."),
    FieldSpec::boolean("is_upstream")
        .omit_if_zero()
        .description("Determines whether stats for upstream or downstream dependencies should be queried."),
    FieldSpec::string("name")
        .required()
        .description("The name of query for use in formulas."),
];

static APM_RESOURCE_STATS_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .required()
        .valid_values(&["apm_resource_stats"])
        .description("The data source for APM Resource Stats queries."),
    CROSS_ORG_UUIDS,
    FieldSpec::string("env")
        .required()
        .description("APM environment."),
    FieldSpec::string("name")
        .required()
        .description("The name of query for use in formulas."),
    FieldSpec::string("stat")
        .required()
        .valid_values(&[
            "errors",
            "error_rate",
            "hits",
            "latency_avg",
            "latency_distribution",
            "latency_max",
            "latency_p50",
            "latency_p75",
            "latency_p90",
            "latency_p95",
            "latency_p99",
        ])
        .description("APM statistic."),
    FieldSpec::string("operation_name")
        .omit_if_zero()
        .description("Name of operation on service."),
    FieldSpec::string("resource_name")
        .omit_if_zero()
        .description("APM resource."),
    FieldSpec::string("service")
        .required()
        .description("APM service."),
    FieldSpec::string("primary_tag_name")
        .omit_if_zero()
        .description("The name of the second primary tag used within APM."),
    FieldSpec::string("primary_tag_value")
        .omit_if_zero()
        .description("Filter APM data by the second primary tag."),
    FieldSpec::string_list("group_by")
        .omit_if_zero()
        .description("Array of fields to group results by."),
];

static SLO_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .required()
        .valid_values(&["slo"])
        .description("The data source for SLO queries."),
    CROSS_ORG_UUIDS,
    FieldSpec::string("slo_id")
        .required()
        .description("ID of an SLO to query."),
    FieldSpec::string("measure")
        .required()
        .valid_values(&[
            "good_events",
            "bad_events",
            "slo_status",
            "error_budget_remaining",
            "burn_rate",
            "error_budget_burndown",
        ])
        .description("SLO measures queries."),
    FieldSpec::string("name")
        .omit_if_zero()
        .description("The name of query for use in formulas."),
    FieldSpec::string("group_mode")
        .default_value(DefaultValue::String("overall"))
        .valid_values(&["overall", "components"])
        .description("Group mode to query measures."),
    FieldSpec::string("slo_query_type")
        .default_value(DefaultValue::String("metric"))
        .valid_values(&["metric", "time_slice"])
        .description("Type of the SLO to query."),
    FieldSpec::string("additional_query_filters")
        .omit_if_zero()
        .description("Additional filters applied to the SLO query."),
];

static CLOUD_COST_QUERY: &[FieldSpec] = &[
    FieldSpec::string("data_source")
        .required()
        .valid_values(&["cloud_cost"])
        .description("The data source for cloud cost queries."),
    CROSS_ORG_UUIDS,
    FieldSpec::string("query")
        .required()
        .description("The cloud cost query definition."),
    FieldSpec::string("aggregator")
        .omit_if_zero()
        .valid_values(AGGREGATORS)
        .description("The aggregation methods available for cloud cost queries."),
    FieldSpec::string("name")
        .required()
        .description("The name of the query for use in formulas."),
];

/// Query kinds as plain blocks, for the schema of a request's `query` list.
pub static QUERY_BLOCKS: &[FieldSpec] = &[
    FieldSpec::block("metric_query", METRIC_QUERY)
        .omit_if_zero()
        .description("A timeseries formula and functions metrics query."),
    FieldSpec::block("event_query", EVENT_QUERY)
        .omit_if_zero()
        .description("A timeseries formula and functions events query."),
    FieldSpec::block("process_query", PROCESS_QUERY)
        .omit_if_zero()
        .description("The process query using formulas and functions."),
    FieldSpec::block("apm_dependency_stats_query", APM_DEPENDENCY_STATS_QUERY)
        .omit_if_zero()
        .description("The APM Dependency Stats query using formulas and functions."),
    FieldSpec::block("apm_resource_stats_query", APM_RESOURCE_STATS_QUERY)
        .omit_if_zero()
        .description("The APM Resource Stats query using formulas and functions."),
    FieldSpec::block("slo_query", SLO_QUERY)
        .omit_if_zero()
        .description("The SLO query using formulas and functions."),
    FieldSpec::block("cloud_cost_query", CLOUD_COST_QUERY)
        .omit_if_zero()
        .description("The Cloud Cost query using formulas and functions."),
];

/// The same query kinds as variants keyed by `data_source`.
///
/// Each variant declares `data_source` itself, so nothing is injected.
pub static QUERY_VARIANTS: &[FieldSpec] = &[
    FieldSpec::block("metric_query", METRIC_QUERY).variant(Discriminator::AnyOf(&["metrics"])),
    FieldSpec::block("event_query", EVENT_QUERY).variant(Discriminator::AnyOf(EVENT_DATA_SOURCES)),
    FieldSpec::block("process_query", PROCESS_QUERY)
        .variant(Discriminator::AnyOf(&["process", "container"])),
    FieldSpec::block("apm_dependency_stats_query", APM_DEPENDENCY_STATS_QUERY)
        .variant(Discriminator::AnyOf(&["apm_dependency_stats"])),
    FieldSpec::block("apm_resource_stats_query", APM_RESOURCE_STATS_QUERY)
        .variant(Discriminator::AnyOf(&["apm_resource_stats"])),
    FieldSpec::block("slo_query", SLO_QUERY).variant(Discriminator::AnyOf(&["slo"])),
    FieldSpec::block("cloud_cost_query", CLOUD_COST_QUERY)
        .variant(Discriminator::AnyOf(&["cloud_cost"])),
];

/// One element of a request's `query` list, as a union.
pub static QUERY: FieldSpec = FieldSpec::one_of("query", "data_source", QUERY_VARIANTS);

/// Build the wire object of one `query` element.
///
/// Elements without a populated kind build as null.
#[must_use]
pub fn build_query(element: &ConfigObject) -> Value {
    match populated_variant(QUERY_VARIANTS, element) {
        Some((variant, obj)) => {
            trace!(variant = variant.config_key, "building formula query");
            Value::Object(build_wire(variant.children(), obj))
        }
        None => Value::Null,
    }
}

/// Flatten one wire query into a `query` element.
///
/// Queries with an unrecognised `data_source` are matched on their shape: a
/// `compute` list marks an event query, a `query` string a metric query.
/// Anything else flattens to an empty element.
///
/// # Errors
///
/// Returns an error when a field of the matched kind is malformed.
pub fn flatten_query(wire: &Map<String, Value>) -> Result<ConfigObject> {
    let variant = select_variant(QUERY_VARIANTS, discriminator_value(&QUERY, wire))
        .or_else(|| legacy_variant(wire));
    let mut element = ConfigObject::new();
    if let Some(variant) = variant {
        let inner = flatten_wire(variant.children(), wire)?;
        element.insert(variant.config_key.to_string(), ConfigValue::block(inner));
    } else {
        trace!(
            data_source = ?discriminator_value(&QUERY, wire),
            "formula query matches no known kind"
        );
    }
    Ok(element)
}

fn legacy_variant(wire: &Map<String, Value>) -> Option<&'static FieldSpec> {
    let key = if wire.contains_key("compute") {
        "event_query"
    } else if wire.contains_key("query") {
        "metric_query"
    } else {
        return None;
    };
    QUERY_VARIANTS.iter().find(|v| v.config_key == key)
}

/// Exactly-one-kind problems of one `query` element at `path`.
///
/// Field-level problems of the populated kinds are reported by the schema of
/// [`QUERY_BLOCKS`], so only the union rule is checked here.
#[must_use]
pub fn query_variant_errors(path: &str, element: &ConfigObject) -> Vec<ValidationError> {
    variant_errors(path, QUERY_VARIANTS, element)
}

/// Exactly-one-variant problems of a list element whose entries are unions of
/// `variants`. Still-unknown variants defer the check.
#[must_use]
pub fn variant_errors(
    path: &str,
    variants: &'static [FieldSpec],
    element: &ConfigObject,
) -> Vec<ValidationError> {
    let populated: Vec<String> = variants
        .iter()
        .filter(|v| element.get(v.config_key).and_then(ConfigValue::block_object).is_some())
        .map(|v| v.config_key.to_string())
        .collect();
    let pending = variants
        .iter()
        .any(|v| matches!(element.get(v.config_key), Some(ConfigValue::Unknown)));
    match populated.len() {
        1 => Vec::new(),
        0 if pending => Vec::new(),
        0 => vec![ValidationError::MissingVariant {
            path: path.to_string(),
            variants: variants.iter().map(|v| v.config_key.to_string()).collect(),
        }],
        _ => vec![ValidationError::ConflictingVariants {
            path: path.to_string(),
            variants: populated,
        }],
    }
}

/// Response format a formula request of widget type `wire_type` asks for.
///
/// `None` for widgets without formula support.
#[must_use]
pub fn response_format(wire_type: &str) -> Option<&'static str> {
    match wire_type {
        "timeseries" | "heatmap" => Some("timeseries"),
        "query_value" | "toplist" | "change" | "sunburst" | "geomap" | "treemap"
        | "query_table" => Some("scalar"),
        _ => None,
    }
}

/// Known, object-shaped elements of the list at `key`, in the order the
/// engine builds them.
pub(crate) fn objects<'a>(
    config: &'a ConfigObject,
    key: &str,
) -> impl Iterator<Item = &'a ConfigObject> {
    config
        .get(key)
        .and_then(ConfigValue::as_list)
        .unwrap_or_default()
        .iter()
        .filter(|v| v.is_known())
        .filter_map(ConfigValue::as_object)
}

/// Add `queries` and `response_format` to a built request.
pub(crate) fn build_request_queries(
    format: &'static str,
    request: &ConfigObject,
    out: &mut Map<String, Value>,
) {
    let queries: Vec<Value> = objects(request, "query").map(build_query).collect();
    let has_formulas = objects(request, "formula").next().is_some();
    let has_queries = !queries.is_empty();
    if has_queries {
        out.insert("queries".to_string(), Value::Array(queries));
    }
    if has_formulas || has_queries {
        out.insert(
            "response_format".to_string(),
            Value::String(format.to_string()),
        );
    }
}

/// Flatten the `queries` of a wire request into the request's `query` list.
pub(crate) fn flatten_request_queries(
    wire: &Map<String, Value>,
    out: &mut ConfigObject,
) -> Result<()> {
    let Some(queries) = wire.get("queries").and_then(Value::as_array) else {
        return Ok(());
    };
    let elements = queries
        .iter()
        .map(|q| match q.as_object() {
            Some(obj) => flatten_query(obj).map(ConfigValue::Object),
            None => Ok(ConfigValue::Object(ConfigObject::new())),
        })
        .collect::<Result<Vec<_>>>()?;
    out.insert("query".to_string(), ConfigValue::List(elements));
    Ok(())
}

/// Union problems of every element of a request's `query` list.
pub(crate) fn request_query_errors(path: &str, request: &ConfigObject) -> Vec<ValidationError> {
    let list = join(path, "query");
    objects(request, "query")
        .enumerate()
        .flat_map(|(i, element)| query_variant_errors(&format!("{list}[{i}]"), element))
        .collect()
}
