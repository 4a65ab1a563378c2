//! Datadog dashboard resource for tfdash
//!
//! Field tables for the dashboard, its widgets and formula queries, plus the
//! dashboard-level glue the tables cannot express:
//! - widget definitions dispatched by configuration key and wire `type`
//!   ([`build_widget`], [`flatten_widget`])
//! - group widgets nesting further widgets
//! - formula `query` lists whose elements are each a union of query kinds
//!   ([`queries`])
//! - request `sort.order_by` unions and query table `text_formats`
//!   ([`requests`])
//!
//! Everything else is driven through [`tfdash_mapping`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dashboard;
mod error;
pub mod fields;
pub mod queries;
pub mod requests;
pub mod widgets;

pub use dashboard::{
    build_dashboard, build_widget, dashboard_schema, definition_schema, flatten_dashboard,
    flatten_widget, marshal_dashboard, validate_dashboard,
};
pub use error::{Error, Result};
pub use fields::{COMMON_WIDGET_FIELDS, DASHBOARD_FIELDS, WIDGET_CONTAINER, WIDGET_LAYOUT};
pub use widgets::{GROUP_TYPE, WIDGETS, by_config_key, by_wire_type};
