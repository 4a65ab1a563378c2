//! Field groups shared between widgets and the dashboard itself.

use tfdash_mapping::{Discriminator, FieldSpec};

use crate::queries::QUERY_BLOCKS;

pub(crate) const ALIGNMENTS: &[&str] = &["center", "left", "right"];
pub(crate) const VERTICAL_ALIGNMENTS: &[&str] = &["center", "top", "bottom"];
pub(crate) const AGGREGATORS: &[&str] = &["avg", "last", "max", "min", "sum", "percentile"];
pub(crate) const SORT_ORDERS: &[&str] = &["asc", "desc"];

// =============================================================================
// Widget common fields
// =============================================================================

static CUSTOM_LINK: &[FieldSpec] = &[
    FieldSpec::string("label")
        .omit_if_zero()
        .description("The label for the custom link URL."),
    FieldSpec::string("link").description("The URL of the custom link."),
    FieldSpec::boolean("is_hidden")
        .omit_if_zero()
        .description("The flag for toggling context menu link visibility."),
    FieldSpec::string("override_label").omit_if_zero().description(
        "The label ID that refers to a context menu link item. When `override_label` is provided, the client request omits the label field.",
    ),
];

/// Fields every widget definition carries.
pub static COMMON_WIDGET_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("title")
        .omit_if_zero()
        .description("The title of the widget."),
    FieldSpec::string("title_size")
        .omit_if_zero()
        .description("The size of the widget's title (defaults to 16)."),
    FieldSpec::string("title_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The alignment of the widget's title."),
    FieldSpec::string("live_span")
        .wire_path("time.live_span")
        .omit_if_zero()
        .description("The timeframe to use when displaying the widget."),
    FieldSpec::block_list("custom_link", CUSTOM_LINK)
        .wire_key("custom_links")
        .omit_if_zero()
        .description("A nested block describing a custom link. Multiple `custom_link` blocks are allowed."),
];

/// Position and size of a widget on a free layout dashboard.
pub static WIDGET_LAYOUT: &[FieldSpec] = &[
    FieldSpec::int("x")
        .required()
        .description("The position of the widget on the x (horizontal) axis. Should be greater than or equal to 0."),
    FieldSpec::int("y")
        .required()
        .description("The position of the widget on the y (vertical) axis. Should be greater than or equal to 0."),
    FieldSpec::int("width")
        .required()
        .description("The width of the widget."),
    FieldSpec::int("height")
        .required()
        .description("The height of the widget."),
    FieldSpec::boolean("is_column_break")
        .omit_if_zero()
        .description("Whether the widget should be the first one on the second column in high density or not."),
];

/// Fields of the widget wrapper around a definition.
pub static WIDGET_CONTAINER: &[FieldSpec] = &[
    FieldSpec::int("id")
        .computed()
        .omit_if_zero()
        .description("The ID of the widget."),
    FieldSpec::block("widget_layout", WIDGET_LAYOUT)
        .wire_key("layout")
        .omit_if_zero()
        .description("The layout of the widget on a 'free' dashboard."),
];

// =============================================================================
// Axes, markers, events
// =============================================================================

pub(crate) static AXIS: &[FieldSpec] = &[
    FieldSpec::string("label")
        .omit_if_zero()
        .description("The label of the axis to display on the graph."),
    FieldSpec::string("min")
        .omit_if_zero()
        .description("Specify the minimum value to show on the Y-axis."),
    FieldSpec::string("max")
        .omit_if_zero()
        .description("Specify the maximum value to show on the Y-axis."),
    FieldSpec::string("scale")
        .omit_if_zero()
        .description("Specify the scale type, options: `linear`, `log`, `pow`, `sqrt`."),
    FieldSpec::boolean("include_zero")
        .description("Always include zero or fit the axis to the data range."),
];

pub(crate) static MARKER: &[FieldSpec] = &[
    FieldSpec::string("value")
        .required()
        .description("A mathematical expression describing the marker, for example: `y > 1`, `-5 < y < 0`, `y = 19`."),
    FieldSpec::string("display_type")
        .omit_if_zero()
        .description("How the marker lines are displayed, for example `error dashed`."),
    FieldSpec::string("label")
        .omit_if_zero()
        .description("A label for the line or range."),
];

pub(crate) static EVENT: &[FieldSpec] = &[
    FieldSpec::string("q")
        .required()
        .description("The event query to use in the widget."),
    FieldSpec::string("tags_execution")
        .omit_if_zero()
        .description("The execution method for multi-value filters."),
];

// =============================================================================
// Legacy request queries
// =============================================================================

static LOG_QUERY_SORT: &[FieldSpec] = &[
    FieldSpec::string("aggregation")
        .required()
        .description("The aggregation method."),
    FieldSpec::string("order")
        .required()
        .valid_values(SORT_ORDERS)
        .description("Widget sorting methods."),
    FieldSpec::string("facet")
        .omit_if_zero()
        .description("The facet name."),
];

static LOG_QUERY_GROUP_BY: &[FieldSpec] = &[
    FieldSpec::string("facet").description("The facet name."),
    FieldSpec::int("limit")
        .omit_if_zero()
        .description("The maximum number of items in the group."),
    FieldSpec::block("sort_query", LOG_QUERY_SORT)
        .wire_key("sort")
        .omit_if_zero()
        .description("A list of exactly one element describing the sort query to use."),
];

static LOG_QUERY_COMPUTE: &[FieldSpec] = &[
    FieldSpec::string("aggregation")
        .required()
        .description("The aggregation method."),
    FieldSpec::string("facet")
        .omit_if_zero()
        .description("The facet name."),
    FieldSpec::int("interval")
        .omit_if_zero()
        .description("Define the time interval in seconds."),
];

/// Log, APM, RUM and the other event-store queries of legacy requests.
pub(crate) static LOG_QUERY: &[FieldSpec] = &[
    FieldSpec::string("index")
        .required()
        .description("The name of the index to query."),
    FieldSpec::string("search_query")
        .wire_path("search.query")
        .description("The search query to use."),
    FieldSpec::block("compute_query", LOG_QUERY_COMPUTE)
        .wire_key("compute")
        .omit_if_zero()
        .description("`compute_query` or `multi_compute` is required."),
    FieldSpec::block_list("multi_compute", LOG_QUERY_COMPUTE)
        .omit_if_zero()
        .description("`compute_query` or `multi_compute` is required. Multiple `multi_compute` blocks are allowed."),
    FieldSpec::block_list("group_by", LOG_QUERY_GROUP_BY)
        .omit_if_zero()
        .description("Multiple `group_by` blocks are allowed."),
];

pub(crate) static PROCESS_QUERY: &[FieldSpec] = &[
    FieldSpec::string("metric")
        .required()
        .description("Your chosen metric."),
    FieldSpec::string("search_by")
        .omit_if_zero()
        .description("Your chosen search term."),
    FieldSpec::string_list("filter_by")
        .omit_if_zero()
        .description("A list of processes."),
    FieldSpec::int("limit")
        .omit_if_zero()
        .description("The max number of items in the filter list."),
];

static APM_STATS_COLUMN: &[FieldSpec] = &[
    FieldSpec::string("name")
        .required()
        .description("The column name."),
    FieldSpec::string("alias")
        .omit_if_zero()
        .description("A user-assigned alias for the column."),
    FieldSpec::string("order")
        .omit_if_zero()
        .valid_values(SORT_ORDERS)
        .description("Widget sorting methods."),
    FieldSpec::string("cell_display_mode")
        .omit_if_zero()
        .valid_values(&["number", "bar", "trend"])
        .description("A list of display modes for each table cell."),
];

pub(crate) static APM_STATS_QUERY: &[FieldSpec] = &[
    FieldSpec::string("service")
        .required()
        .description("The service name."),
    FieldSpec::string("name")
        .required()
        .description("The operation name associated with the service."),
    FieldSpec::string("env")
        .required()
        .description("The environment name."),
    FieldSpec::string("primary_tag")
        .required()
        .description("The organization's host group name and value."),
    FieldSpec::string("row_type")
        .required()
        .valid_values(&["service", "resource", "span"])
        .description("The level of detail for the request."),
    FieldSpec::string("resource")
        .omit_if_zero()
        .description("The resource name."),
    FieldSpec::block_list("columns", APM_STATS_COLUMN)
        .omit_if_zero()
        .description("Column properties used by the front end for display."),
];

// =============================================================================
// Formulas
// =============================================================================

pub(crate) static CONDITIONAL_FORMAT: &[FieldSpec] = &[
    FieldSpec::string("comparator")
        .required()
        .valid_values(&["<", "<=", ">", ">="])
        .description("The comparator to use."),
    FieldSpec::float("value")
        .required()
        .description("A value for the comparator."),
    FieldSpec::string("palette")
        .required()
        .valid_values(&[
            "blue",
            "custom_bg",
            "custom_image",
            "custom_text",
            "gray_on_white",
            "grey",
            "green",
            "orange",
            "red",
            "red_on_white",
            "white_on_gray",
            "white_on_green",
            "green_on_white",
            "white_on_red",
            "white_on_yellow",
            "yellow_on_white",
            "black_on_light_yellow",
            "black_on_light_green",
            "black_on_light_red",
        ])
        .description("The color palette to apply."),
    FieldSpec::string("custom_bg_color")
        .omit_if_zero()
        .description("The color palette to apply to the background, same values available as palette."),
    FieldSpec::string("custom_fg_color")
        .omit_if_zero()
        .description("The color palette to apply to the foreground, same values available as palette."),
    FieldSpec::string("image_url")
        .omit_if_zero()
        .description("Displays an image as the background."),
    FieldSpec::boolean("hide_value").description("Setting this to True hides values."),
    FieldSpec::string("timeframe")
        .omit_if_zero()
        .description("Defines the displayed timeframe."),
    FieldSpec::string("metric")
        .omit_if_zero()
        .description("The metric from the request to correlate with this conditional format."),
];

static FORMULA_LIMIT: &[FieldSpec] = &[
    FieldSpec::int("count")
        .omit_if_zero()
        .description("The number of results to return."),
    FieldSpec::string("order")
        .omit_if_zero()
        .valid_values(SORT_ORDERS)
        .description("The direction of the sort."),
];

static FORMULA_STYLE: &[FieldSpec] = &[
    FieldSpec::string("palette")
        .omit_if_zero()
        .description("The color palette used to display the formula."),
    FieldSpec::int("palette_index")
        .omit_if_zero()
        .description("Index specifying which color to use within the palette."),
];

static CELL_DISPLAY_MODE_OPTIONS: &[FieldSpec] = &[
    FieldSpec::string("trend_type")
        .omit_if_zero()
        .valid_values(&["area", "line", "bars"])
        .description("The type of trend line to display."),
    FieldSpec::string("y_scale")
        .omit_if_zero()
        .valid_values(&["shared", "independent"])
        .description("The scale of the y-axis."),
];

static CANONICAL_UNIT: &[FieldSpec] = &[
    FieldSpec::string("per_unit_name")
        .omit_if_zero()
        .description("Per unit name. To represent megabytes/s, set `unit_name = \"megabyte\"` and `per_unit_name = \"second\"`."),
    FieldSpec::string("unit_name")
        .required()
        .description("Unit name. It should be in singular form (`megabyte` and not `megabytes`)."),
];

static CUSTOM_UNIT: &[FieldSpec] = &[FieldSpec::string("label")
    .required()
    .description("Unit label.")];

static UNIT: &[FieldSpec] = &[
    FieldSpec::block("canonical", CANONICAL_UNIT)
        .variant(Discriminator::Exact("canonical_unit"))
        .description("Canonical units."),
    FieldSpec::block("custom", CUSTOM_UNIT)
        .variant(Discriminator::Exact("custom_unit_label"))
        .description("Use custom (non canonical) units."),
];

static UNIT_SCALE: &[FieldSpec] = &[FieldSpec::string("unit_name").required()];

pub(crate) static NUMBER_FORMAT: &[FieldSpec] = &[
    FieldSpec::one_of("unit", "type", UNIT)
        .required()
        .omit_if_zero()
        .description("Unit of the number format."),
    FieldSpec::block("unit_scale", UNIT_SCALE).omit_if_zero(),
];

/// One formula of a formula and function request.
pub(crate) static FORMULA: &[FieldSpec] = &[
    FieldSpec::string("formula_expression")
        .wire_key("formula")
        .required()
        .description("A string expression built from queries, formulas, and functions."),
    FieldSpec::string("alias")
        .omit_if_zero()
        .description("An expression alias."),
    FieldSpec::block("limit", FORMULA_LIMIT)
        .omit_if_zero()
        .description("The options for limiting results returned."),
    FieldSpec::string("cell_display_mode")
        .omit_if_zero()
        .valid_values(&["number", "bar", "trend"])
        .description("A list of display modes for each table cell."),
    FieldSpec::block("cell_display_mode_options", CELL_DISPLAY_MODE_OPTIONS)
        .omit_if_zero()
        .description("Options for the cell display mode. Only used when `cell_display_mode` is set to `trend`."),
    FieldSpec::block_list("conditional_formats", CONDITIONAL_FORMAT)
        .omit_if_zero()
        .description("Conditional formats allow you to set the color of your widget content or background depending on the rule applied to your data."),
    FieldSpec::block("style", FORMULA_STYLE)
        .omit_if_zero()
        .description("Styling options for widget formulas."),
    FieldSpec::block("number_format", NUMBER_FORMAT)
        .omit_if_zero()
        .description("Number formatting options for the formula."),
];

/// `query` and `formula` lists shared by every formula capable request.
///
/// `query` is a list of unions the engine cannot express as a single field,
/// so it only contributes schema here; [`crate::queries`] builds and flattens
/// its elements.
pub(crate) static QUERY_LIST: FieldSpec = FieldSpec::block_list("query", QUERY_BLOCKS)
    .schema_only()
    .description("A list of queries to use in the widget.");

pub(crate) static FORMULA_LIST: FieldSpec = FieldSpec::block_list("formula", FORMULA)
    .wire_key("formulas")
    .omit_if_zero()
    .description("A list of formulas to use in the widget.");

pub(crate) static REQUEST_STYLE: &[FieldSpec] = &[FieldSpec::string("palette")
    .omit_if_zero()
    .description("The color palette to apply to the widget.")];

// =============================================================================
// Dashboard
// =============================================================================

static TEMPLATE_VARIABLE: &[FieldSpec] = &[
    FieldSpec::string("name")
        .required()
        .description("The name of the variable."),
    FieldSpec::string("prefix")
        .omit_if_zero()
        .description("The tag prefix associated with the variable."),
    FieldSpec::string("default")
        .omit_if_zero()
        .deprecated("Use `defaults` instead.")
        .conflicts_with(&["defaults"])
        .description("The default value for the template variable on dashboard load."),
    FieldSpec::string_list("defaults")
        .omit_if_zero()
        .conflicts_with(&["default"])
        .description("One or many default values for template variables on load."),
    FieldSpec::string_list("available_values")
        .omit_if_zero()
        .description("The list of values that the template variable drop-down is limited to."),
];

static TEMPLATE_VARIABLE_PRESET_VALUE: &[FieldSpec] = &[
    FieldSpec::string("name")
        .omit_if_zero()
        .description("The name of the template variable."),
    FieldSpec::string("value")
        .omit_if_zero()
        .deprecated("Use `values` instead.")
        .conflicts_with(&["values"])
        .description("The value that should be assumed by the template variable in this preset."),
    FieldSpec::string_list("values")
        .omit_if_zero()
        .conflicts_with(&["value"])
        .description("One or many template variable values within the saved view."),
];

static TEMPLATE_VARIABLE_PRESET: &[FieldSpec] = &[
    FieldSpec::string("name")
        .omit_if_zero()
        .description("The name of the preset."),
    FieldSpec::block_list("template_variable", TEMPLATE_VARIABLE_PRESET_VALUE)
        .wire_key("template_variables")
        .description("The template variable names and assumed values under the given preset."),
];

/// Top-level dashboard fields. Widgets are handled by [`crate::dashboard`].
pub static DASHBOARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("title")
        .required()
        .description("The title of the dashboard."),
    FieldSpec::string("description").description("The description of the dashboard."),
    FieldSpec::string("layout_type")
        .required()
        .force_new()
        .valid_values(&["ordered", "free"])
        .description("The layout type of the dashboard."),
    FieldSpec::string("reflow_type")
        .omit_if_zero()
        .valid_values(&["auto", "fixed"])
        .description("The reflow type of a new dashboard layout. Set this only when layout type is `ordered`."),
    FieldSpec::string_list("notify_list")
        .use_set()
        .description("The list of handles for the users to notify when changes are made to this dashboard."),
    FieldSpec::string_list("tags").description("A list of tags assigned to the dashboard."),
    FieldSpec::block_list("template_variable", TEMPLATE_VARIABLE)
        .wire_key("template_variables")
        .description("The list of template variables for this dashboard."),
    FieldSpec::block_list("template_variable_preset", TEMPLATE_VARIABLE_PRESET)
        .wire_key("template_variable_presets")
        .description("The list of selectable template variable presets for this dashboard."),
    FieldSpec::string_list("restricted_roles")
        .omit_if_zero()
        .use_set()
        .conflicts_with(&["is_read_only"])
        .description("UUIDs of roles whose associated users are authorized to edit the dashboard."),
    FieldSpec::boolean("is_read_only")
        .omit_if_zero()
        .deprecated("Prefer using `restricted_roles` to define which roles are required to edit the dashboard.")
        .conflicts_with(&["restricted_roles"])
        .description("Whether this dashboard is read-only."),
    FieldSpec::string("url")
        .computed()
        .schema_only()
        .description("The URL of the dashboard."),
];
