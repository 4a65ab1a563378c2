//! Widget definitions.
//!
//! Each [`WidgetSpec`] names the definition block a widget occupies in
//! configuration (`note_definition`) and the `type` it carries on the wire
//! (`note`). Every definition also gets [`COMMON_WIDGET_FIELDS`].
//!
//! [`COMMON_WIDGET_FIELDS`]: crate::fields::COMMON_WIDGET_FIELDS

use tfdash_mapping::{ConfigValue, DefaultValue, Discriminator, FieldSpec, WidgetSpec};

use crate::fields::{
    AGGREGATORS, ALIGNMENTS, APM_STATS_QUERY, AXIS, CONDITIONAL_FORMAT, EVENT, FORMULA_LIST,
    LOG_QUERY, MARKER, PROCESS_QUERY, QUERY_LIST, REQUEST_STYLE, SORT_ORDERS, VERTICAL_ALIGNMENTS,
};
use crate::requests::{TEXT_FORMATS, WIDGET_SORT};

fn not_empty(value: &ConfigValue) -> std::result::Result<(), String> {
    match value.as_str() {
        Some(s) if s.trim().is_empty() => Err("must not be empty".to_string()),
        _ => Ok(()),
    }
}

// =============================================================================
// Simple widgets
// =============================================================================

static ALERT_GRAPH: &[FieldSpec] = &[
    FieldSpec::string("alert_id")
        .required()
        .description("The ID of the monitor used by the widget."),
    FieldSpec::string("viz_type")
        .required()
        .valid_values(&["timeseries", "toplist"])
        .description("Type of visualization to use when displaying the widget."),
];

static ALERT_VALUE: &[FieldSpec] = &[
    FieldSpec::string("alert_id")
        .required()
        .description("The ID of the monitor used by the widget."),
    FieldSpec::int("precision")
        .omit_if_zero()
        .description("The precision to use when displaying the value."),
    FieldSpec::string("unit")
        .omit_if_zero()
        .description("The unit for the value displayed in the widget."),
    FieldSpec::string("text_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The alignment of the text in the widget."),
];

static FREE_TEXT: &[FieldSpec] = &[
    FieldSpec::string("text")
        .required()
        .description("The text to display in the widget."),
    FieldSpec::string("color")
        .omit_if_zero()
        .description("The color of the text in the widget."),
    FieldSpec::string("font_size")
        .omit_if_zero()
        .description("The size of the text in the widget."),
    FieldSpec::string("text_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The alignment of the text in the widget."),
];

static IFRAME: &[FieldSpec] = &[FieldSpec::string("url")
    .required()
    .description("The URL to use as a data source for the widget.")];

static IMAGE: &[FieldSpec] = &[
    FieldSpec::string("url")
        .required()
        .description("The URL to use as a data source for the widget."),
    FieldSpec::string("url_dark_theme")
        .omit_if_zero()
        .description("The URL in dark mode to use as a data source for the widget."),
    FieldSpec::string("sizing")
        .omit_if_zero()
        .valid_values(&["fill", "contain", "cover", "none", "scale-down", "zoom", "fit", "center"])
        .description("The preferred method to adapt the dimensions of the image. The values are based on the image `object-fit` CSS properties."),
    FieldSpec::string("margin")
        .omit_if_zero()
        .valid_values(&["sm", "md", "lg", "small", "large"])
        .description("The margins to use around the image."),
    FieldSpec::boolean("has_background").description("Whether to display a background or not."),
    FieldSpec::boolean("has_border").description("Whether to display a border or not."),
    FieldSpec::string("horizontal_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The horizontal alignment for the widget."),
    FieldSpec::string("vertical_align")
        .omit_if_zero()
        .valid_values(VERTICAL_ALIGNMENTS)
        .description("The vertical alignment for the widget."),
];

static NOTE: &[FieldSpec] = &[
    FieldSpec::string("content")
        .required()
        .validator(not_empty)
        .description("The content of the note."),
    FieldSpec::string("background_color")
        .omit_if_zero()
        .description("The background color of the note."),
    FieldSpec::string("font_size")
        .omit_if_zero()
        .description("The size of the text."),
    FieldSpec::string("text_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The alignment of the widget's text."),
    FieldSpec::string("vertical_align")
        .omit_if_zero()
        .valid_values(VERTICAL_ALIGNMENTS)
        .description("The vertical alignment for the widget."),
    FieldSpec::boolean("has_padding")
        .default_value(DefaultValue::Bool(true))
        .description("Whether to add padding or not."),
    FieldSpec::boolean("show_tick").description("Whether to show a tick or not."),
    FieldSpec::string("tick_pos")
        .omit_if_zero()
        .description("When `tick = true`, a string with a percent sign indicating the position of the tick."),
    FieldSpec::string("tick_edge")
        .omit_if_zero()
        .valid_values(&["bottom", "left", "right", "top"])
        .description("When `tick = true`, a string indicating on which side of the widget the tick should be displayed."),
];

static EVENT_STREAM: &[FieldSpec] = &[
    FieldSpec::string("query")
        .required()
        .description("The query to use in the widget."),
    FieldSpec::string("event_size")
        .omit_if_zero()
        .valid_values(&["s", "l"])
        .description("The size to use to display an event."),
    FieldSpec::string("tags_execution")
        .omit_if_zero()
        .description("The execution method for multi-value filters, options: `and` or `or`."),
];

static EVENT_TIMELINE: &[FieldSpec] = &[
    FieldSpec::string("query")
        .required()
        .description("The query to use in the widget."),
    FieldSpec::string("tags_execution")
        .omit_if_zero()
        .description("The execution method for multi-value filters, options: `and` or `or`."),
];

static CHECK_STATUS: &[FieldSpec] = &[
    FieldSpec::string("check")
        .required()
        .description("The check to use in the widget."),
    FieldSpec::string("grouping")
        .required()
        .valid_values(&["check", "cluster"])
        .description("The kind of grouping to use."),
    FieldSpec::string("group")
        .omit_if_zero()
        .description("The check group to use in the widget."),
    FieldSpec::string_list("group_by")
        .omit_if_zero()
        .description("When `grouping = \"cluster\"`, indicates a list of tags to use for grouping."),
    FieldSpec::string_list("tags")
        .omit_if_zero()
        .description("A list of tags to use in the widget."),
];

// =============================================================================
// Request widgets
// =============================================================================

static SORT: FieldSpec = FieldSpec::block("sort", WIDGET_SORT)
    .omit_if_zero()
    .description("The controls for sorting the widget.");

static TIMESERIES_REQUEST_STYLE: &[FieldSpec] = &[
    FieldSpec::string("palette")
        .omit_if_zero()
        .description("A color palette to apply to the widget."),
    FieldSpec::string("line_type")
        .omit_if_zero()
        .valid_values(&["dashed", "dotted", "solid"])
        .description("The type of lines displayed."),
    FieldSpec::string("line_width")
        .omit_if_zero()
        .valid_values(&["normal", "thick", "thin"])
        .description("The width of line displayed."),
    FieldSpec::string("order_by")
        .omit_if_zero()
        .valid_values(&["tags", "values"])
        .description("How to order series in timeseries visualizations."),
];

static TIMESERIES_METADATA: &[FieldSpec] = &[
    FieldSpec::string("expression")
        .required()
        .description("The expression name."),
    FieldSpec::string("alias_name")
        .omit_if_zero()
        .description("The expression alias."),
];

static TIMESERIES_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::string("display_type")
        .omit_if_zero()
        .valid_values(&["area", "bars", "line", "overlay"])
        .description("How to display the marker lines."),
    FieldSpec::boolean("on_right_yaxis")
        .description("A Boolean indicating whether the request uses the right or left Y-Axis."),
    FieldSpec::block("style", TIMESERIES_REQUEST_STYLE)
        .omit_if_zero()
        .description("The style of the widget graph."),
    FieldSpec::block_list("metadata", TIMESERIES_METADATA)
        .omit_if_zero()
        .description("Used to define expression aliases."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("network_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("audit_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("profile_metrics_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
];

static TIMESERIES: &[FieldSpec] = &[
    FieldSpec::boolean("show_legend")
        .description("Whether or not to show the legend on this widget."),
    FieldSpec::string("legend_size")
        .omit_if_zero()
        .valid_values(&["0", "2", "4", "8", "16", "auto"])
        .description("The size of the legend displayed in the widget."),
    FieldSpec::string("legend_layout")
        .omit_if_zero()
        .valid_values(&["auto", "horizontal", "vertical"])
        .description("The layout of the legend displayed in the widget."),
    FieldSpec::string_list("legend_columns")
        .omit_if_zero()
        .use_set()
        .valid_values(&["value", "avg", "sum", "min", "max"])
        .description("A list of columns to display in the legend."),
    FieldSpec::block("yaxis", AXIS)
        .omit_if_zero()
        .description("A nested block describing the Y-Axis Controls."),
    FieldSpec::block("right_yaxis", AXIS)
        .omit_if_zero()
        .description("A nested block describing the right Y-Axis Controls."),
    FieldSpec::block_list("marker", MARKER)
        .wire_key("markers")
        .omit_if_zero()
        .description("A nested block describing the marker to use when displaying the widget."),
    FieldSpec::block_list("event", EVENT)
        .wire_key("events")
        .omit_if_zero()
        .description("The definition of the event to overlay on the graph."),
    FieldSpec::block_list("request", TIMESERIES_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static HEATMAP_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("style", REQUEST_STYLE)
        .omit_if_zero()
        .description("The style of the widget graph."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
];

static HEATMAP: &[FieldSpec] = &[
    FieldSpec::boolean("show_legend")
        .description("Whether or not to show the legend on this widget."),
    FieldSpec::string("legend_size")
        .omit_if_zero()
        .description("The size of the legend displayed in the widget."),
    FieldSpec::block("yaxis", AXIS)
        .omit_if_zero()
        .description("A nested block describing the Y-Axis Controls."),
    FieldSpec::block_list("event", EVENT)
        .wire_key("events")
        .omit_if_zero()
        .description("The definition of the event to overlay on the graph."),
    FieldSpec::block_list("request", HEATMAP_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static TIMESERIES_BACKGROUND: &[FieldSpec] = &[
    FieldSpec::string("type")
        .required()
        .valid_values(&["area", "bars"])
        .description("Whether the Timeseries is made using an area or bars."),
    FieldSpec::block("yaxis", AXIS)
        .omit_if_zero()
        .description("A nested block describing the Y-Axis Controls."),
];

static QUERY_VALUE_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("audit_query", LOG_QUERY)
        .omit_if_zero()
        .description("The audit query to use in the widget."),
    FieldSpec::string("aggregator")
        .omit_if_zero()
        .valid_values(AGGREGATORS)
        .description("The aggregator to use for time aggregation."),
    FieldSpec::block_list("conditional_formats", CONDITIONAL_FORMAT)
        .omit_if_zero()
        .description("Conditional formats allow you to set the color of your widget content or background depending on the rule applied to your data."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
    SORT,
];

static QUERY_VALUE: &[FieldSpec] = &[
    FieldSpec::boolean("autoscale")
        .description("A Boolean indicating whether to automatically scale the tile."),
    FieldSpec::string("custom_unit")
        .omit_if_zero()
        .description("The unit for the value displayed in the widget."),
    FieldSpec::int("precision").description("The precision to use when displaying the tile."),
    FieldSpec::string("text_align")
        .omit_if_zero()
        .valid_values(ALIGNMENTS)
        .description("The alignment of the widget's text."),
    FieldSpec::block("timeseries_background", TIMESERIES_BACKGROUND)
        .omit_if_zero()
        .description("Set a timeseries on the widget background."),
    FieldSpec::block_list("request", QUERY_VALUE_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static SUNBURST_LEGEND_INLINE: &[FieldSpec] = &[
    FieldSpec::string("type")
        .required()
        .valid_values(&["inline", "automatic"])
        .description("The type of legend (inline or automatic)."),
    FieldSpec::boolean("hide_value").description("Whether to hide the values of the groups."),
    FieldSpec::boolean("hide_percent")
        .description("Whether to hide the percentages of the groups."),
];

static SUNBURST_LEGEND_TABLE: &[FieldSpec] = &[FieldSpec::string("type")
    .required()
    .valid_values(&["table", "none"])
    .description("The type of legend (table or none).")];

static SUNBURST_LEGEND: &[FieldSpec] = &[
    FieldSpec::block("legend_inline", SUNBURST_LEGEND_INLINE)
        .variant(Discriminator::AnyOf(&["inline", "automatic"]))
        .description("Used to configure the inline legend."),
    FieldSpec::block("legend_table", SUNBURST_LEGEND_TABLE)
        .variant(Discriminator::AnyOf(&["table", "none"]))
        .description("Used to configure the table legend."),
];

static SUNBURST_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("network_query", LOG_QUERY)
        .omit_if_zero()
        .description("The network query to use in the widget."),
    FieldSpec::block("audit_query", LOG_QUERY)
        .omit_if_zero()
        .description("The audit query to use in the widget."),
    FieldSpec::block("style", REQUEST_STYLE)
        .omit_if_zero()
        .description("Define style for the widget's request."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
    SORT,
];

static SUNBURST: &[FieldSpec] = &[
    FieldSpec::boolean("hide_total")
        .omit_if_zero()
        .description("Whether or not to show the total value in the widget."),
    FieldSpec::one_of("legend", "type", SUNBURST_LEGEND)
        .omit_if_zero()
        .description("The legend of the widget, either inline or as a table."),
    FieldSpec::block_list("request", SUNBURST_REQUEST)
        .wire_key("requests")
        .description("Nested block describing the request to use when displaying the widget."),
];

static CHANGE_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::string("change_type")
        .omit_if_zero()
        .valid_values(&["absolute", "relative"])
        .description("Whether to show absolute or relative change."),
    FieldSpec::string("compare_to")
        .omit_if_zero()
        .valid_values(&["hour_before", "day_before", "week_before", "month_before"])
        .description("Choose from when to compare current data to."),
    FieldSpec::boolean("increase_good")
        .description("A Boolean indicating whether an increase in the value is good (displayed in green) or not (displayed in red)."),
    FieldSpec::string("order_by")
        .omit_if_zero()
        .valid_values(&["change", "name", "present", "past"])
        .description("What to order by."),
    FieldSpec::string("order_dir")
        .omit_if_zero()
        .valid_values(SORT_ORDERS)
        .description("Widget sorting method."),
    FieldSpec::boolean("show_present").description("If set to `true`, displays the current value."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
];

static CHANGE: &[FieldSpec] = &[FieldSpec::block_list("request", CHANGE_REQUEST)
    .wire_key("requests")
    .description("A nested block describing the request to use when displaying the widget.")];

static DISTRIBUTION_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("style", REQUEST_STYLE)
        .omit_if_zero()
        .description("The style of the widget graph."),
    FieldSpec::block("apm_stats_query", APM_STATS_QUERY)
        .omit_if_zero()
        .description("The APM stats query to use in the widget."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
];

// Unlike `AXIS`, `include_zero` is left out of the body when false.
static DISTRIBUTION_XAXIS: &[FieldSpec] = &[
    FieldSpec::string("scale")
        .omit_if_zero()
        .description("Specify the scale type, options: `linear`, `log`, `pow`, `sqrt`."),
    FieldSpec::string("min")
        .omit_if_zero()
        .description("Specify the minimum value to show on the axis."),
    FieldSpec::string("max")
        .omit_if_zero()
        .description("Specify the maximum value to show on the axis."),
    FieldSpec::boolean("include_zero")
        .omit_if_zero()
        .description("Always include zero or fit the axis to the data range."),
];

static DISTRIBUTION_YAXIS: &[FieldSpec] = &[
    FieldSpec::string("scale")
        .omit_if_zero()
        .description("Specify the scale type, options: `linear`, `log`, `pow`, `sqrt`."),
    FieldSpec::string("min")
        .omit_if_zero()
        .description("Specify the minimum value to show on the axis."),
    FieldSpec::string("max")
        .omit_if_zero()
        .description("Specify the maximum value to show on the axis."),
    FieldSpec::boolean("include_zero")
        .omit_if_zero()
        .description("Always include zero or fit the axis to the data range."),
    FieldSpec::string("label")
        .omit_if_zero()
        .description("The label of the axis to display on the graph."),
];

static DISTRIBUTION: &[FieldSpec] = &[
    FieldSpec::boolean("show_legend")
        .description("Whether or not to show the legend on this widget."),
    FieldSpec::string("legend_size")
        .omit_if_zero()
        .description("The size of the legend displayed in the widget."),
    FieldSpec::block("xaxis", DISTRIBUTION_XAXIS)
        .omit_if_zero()
        .description("A nested block describing the X-Axis Controls."),
    FieldSpec::block("yaxis", DISTRIBUTION_YAXIS)
        .omit_if_zero()
        .description("A nested block describing the Y-Axis Controls."),
    FieldSpec::block_list("request", DISTRIBUTION_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static GEOMAP_STYLE: &[FieldSpec] = &[
    FieldSpec::string("palette")
        .required()
        .description("The color palette to apply to the widget."),
    FieldSpec::boolean("palette_flip")
        .required()
        .description("A Boolean indicating whether to flip the palette tones."),
];

static GEOMAP_VIEW: &[FieldSpec] = &[FieldSpec::string("focus")
    .required()
    .description("The two-letter ISO code of a country to focus the map on (or `WORLD`).")];

static GEOMAP_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("log_query", LOG_QUERY)
        .omit_if_zero()
        .description("The log query to use in the widget."),
    FieldSpec::block("rum_query", LOG_QUERY)
        .omit_if_zero()
        .description("The RUM query to use in the widget."),
    QUERY_LIST,
    FORMULA_LIST,
    SORT,
];

static GEOMAP: &[FieldSpec] = &[
    FieldSpec::block("style", GEOMAP_STYLE)
        .description("The style of the widget graph."),
    FieldSpec::block("view", GEOMAP_VIEW)
        .description("The view of the world that the map should render."),
    FieldSpec::block_list("request", GEOMAP_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static QUERY_TABLE_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY)
        .omit_if_zero()
        .description("The process query to use in the widget."),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_stats_query", APM_STATS_QUERY).omit_if_zero(),
    FieldSpec::block_list("conditional_formats", CONDITIONAL_FORMAT)
        .omit_if_zero()
        .description("Conditional formats allow you to set the color of your widget content or background depending on the rule applied to your data."),
    FieldSpec::string("aggregator")
        .omit_if_zero()
        .valid_values(AGGREGATORS)
        .description("The aggregator to use for time aggregation."),
    FieldSpec::string("alias")
        .omit_if_zero()
        .description("The alias for the column name (defaults to metric name)."),
    FieldSpec::int("limit")
        .omit_if_zero()
        .description("The number of lines to show in the table."),
    FieldSpec::string("order")
        .omit_if_zero()
        .valid_values(SORT_ORDERS)
        .description("The sort order for the rows."),
    FieldSpec::string_list("cell_display_mode")
        .omit_if_zero()
        .description("A list of display modes for each table cell."),
    FieldSpec::block_list("text_formats", TEXT_FORMATS)
        .schema_only()
        .description("Text formats define how to format text in table widget content."),
    QUERY_LIST,
    FORMULA_LIST,
];

static QUERY_TABLE: &[FieldSpec] = &[
    FieldSpec::string("has_search_bar")
        .omit_if_zero()
        .valid_values(&["always", "never", "auto"])
        .description("Controls the display of the search bar."),
    FieldSpec::block_list("request", QUERY_TABLE_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

static TOPLIST_DISPLAY: &[FieldSpec] = &[FieldSpec::string("type")
    .required()
    .description("The display type for the widget.")];

static TOPLIST_STYLE: &[FieldSpec] = &[
    FieldSpec::block("display", TOPLIST_DISPLAY)
        .omit_if_zero()
        .description("The display mode for the widget."),
    FieldSpec::string("palette")
        .omit_if_zero()
        .description("The color palette for the widget."),
    FieldSpec::string("scaling")
        .omit_if_zero()
        .description("The scaling mode for the widget."),
];

static TOPLIST_REQUEST: &[FieldSpec] = &[
    FieldSpec::string("q")
        .omit_if_zero()
        .description("The metric query to use for this widget."),
    FieldSpec::block("audit_query", LOG_QUERY)
        .omit_if_zero()
        .description("The audit query to use in the widget."),
    FieldSpec::block_list("conditional_formats", CONDITIONAL_FORMAT)
        .omit_if_zero()
        .description("Conditional formats allow you to set the color of your widget content or background depending on the rule applied to your data."),
    FieldSpec::block("style", REQUEST_STYLE)
        .omit_if_zero()
        .description("Define request for the widget's style."),
    FieldSpec::block("log_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("apm_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("rum_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("security_query", LOG_QUERY).omit_if_zero(),
    FieldSpec::block("process_query", PROCESS_QUERY).omit_if_zero(),
    QUERY_LIST,
    FORMULA_LIST,
    SORT,
];

static TOPLIST: &[FieldSpec] = &[
    FieldSpec::block("style", TOPLIST_STYLE)
        .omit_if_zero()
        .description("The style of the widget."),
    FieldSpec::block_list("request", TOPLIST_REQUEST)
        .wire_key("requests")
        .description("A nested block describing the request to use when displaying the widget."),
];

// Treemap requests only take formulas and queries.
static TREEMAP_REQUEST: &[FieldSpec] = &[QUERY_LIST, FORMULA_LIST, SORT];

static TREEMAP: &[FieldSpec] = &[
    FieldSpec::string("color_by")
        .default_value(DefaultValue::String("user"))
        .valid_values(&["user"])
        .description("The attribute used to color the treemap."),
    FieldSpec::block_list("request", TREEMAP_REQUEST)
        .wire_key("requests")
        .omit_if_zero()
        .description("Nested block describing the request to use when displaying the widget."),
];

// =============================================================================
// Group
// =============================================================================

static GROUP: &[FieldSpec] = &[
    FieldSpec::string("layout_type")
        .required()
        .valid_values(&["ordered"])
        .description("The layout type of the group."),
    FieldSpec::string("background_color")
        .omit_if_zero()
        .description("The background color of the group title."),
    FieldSpec::string("banner_img")
        .omit_if_zero()
        .description("The image URL to display as a banner for the group."),
    FieldSpec::boolean("show_title")
        .default_value(DefaultValue::Bool(true))
        .description("Whether to show the title or not."),
];

/// Wire type of the group widget, whose definition nests further widgets.
pub const GROUP_TYPE: &str = "group";

/// Every widget type the dashboard knows, in dispatch order.
pub static WIDGETS: &[WidgetSpec] = &[
    WidgetSpec::new("alert_graph_definition", "alert_graph", ALERT_GRAPH)
        .description("The definition for an Alert Graph widget."),
    WidgetSpec::new("alert_value_definition", "alert_value", ALERT_VALUE)
        .description("The definition for an Alert Value widget."),
    WidgetSpec::new("change_definition", "change", CHANGE)
        .description("The definition for a Change widget."),
    WidgetSpec::new("check_status_definition", "check_status", CHECK_STATUS)
        .description("The definition for a Check Status widget."),
    WidgetSpec::new("distribution_definition", "distribution", DISTRIBUTION)
        .description("The definition for a Distribution widget."),
    WidgetSpec::new("event_stream_definition", "event_stream", EVENT_STREAM)
        .description("The definition for an Event Stream widget."),
    WidgetSpec::new("event_timeline_definition", "event_timeline", EVENT_TIMELINE)
        .description("The definition for an Event Timeline widget."),
    WidgetSpec::new("free_text_definition", "free_text", FREE_TEXT)
        .description("The definition for a Free Text widget."),
    WidgetSpec::new("geomap_definition", "geomap", GEOMAP)
        .description("The definition for a Geomap widget."),
    WidgetSpec::new("heatmap_definition", "heatmap", HEATMAP)
        .description("The definition for a Heatmap widget."),
    WidgetSpec::new("iframe_definition", "iframe", IFRAME)
        .description("The definition for an Iframe widget."),
    WidgetSpec::new("image_definition", "image", IMAGE)
        .description("The definition for an Image widget."),
    WidgetSpec::new("note_definition", "note", NOTE)
        .description("The definition for a Note widget."),
    WidgetSpec::new("query_table_definition", "query_table", QUERY_TABLE)
        .description("The definition for a Query Table widget."),
    WidgetSpec::new("query_value_definition", "query_value", QUERY_VALUE)
        .description("The definition for a Query Value widget."),
    WidgetSpec::new("sunburst_definition", "sunburst", SUNBURST)
        .description("The definition for a Sunburst widget."),
    WidgetSpec::new("timeseries_definition", "timeseries", TIMESERIES)
        .description("The definition for a Timeseries widget."),
    WidgetSpec::new("toplist_definition", "toplist", TOPLIST)
        .description("The definition for a Toplist widget."),
    WidgetSpec::new("treemap_definition", "treemap", TREEMAP)
        .description("The definition for a Treemap widget."),
    WidgetSpec::new("group_definition", GROUP_TYPE, GROUP)
        .description("The definition for a Group widget."),
];

/// Widget spec for a configuration definition key.
#[must_use]
pub fn by_config_key(key: &str) -> Option<&'static WidgetSpec> {
    WIDGETS.iter().find(|w| w.config_key == key)
}

/// Widget spec for a wire `type`.
#[must_use]
pub fn by_wire_type(wire_type: &str) -> Option<&'static WidgetSpec> {
    WIDGETS.iter().find(|w| w.wire_type == wire_type)
}
