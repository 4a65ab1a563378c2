//! # tfdash-mapping
//!
//! Declarative, bidirectional mapping between Terraform configuration trees and
//! JSON API bodies.
//!
//! Each resource field is declared once as a [`FieldSpec`]. From the same table
//! the engine:
//! - derives the configuration schema ([`derive_schema`]),
//! - builds request bodies from configuration ([`build_wire`]),
//! - flattens response bodies back into configuration ([`flatten_wire`]),
//!   resolving discriminated unions with [`resolve_variant`],
//! - validates configuration before any request is sent ([`validate_config`]).
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tfdash_mapping::{build_wire, flatten_wire, ConfigValue, FieldSpec};
//!
//! static FIELDS: &[FieldSpec] = &[
//!     FieldSpec::string("title").omit_if_zero(),
//!     FieldSpec::string("live_span").wire_path("time.live_span").omit_if_zero(),
//! ];
//!
//! let ConfigValue::Object(config) = ConfigValue::from(json!({"title": "CPU", "live_span": "1h"})) else {
//!     unreachable!()
//! };
//! let wire = build_wire(FIELDS, &config);
//! assert_eq!(serde_json::Value::Object(wire.clone()), json!({"title": "CPU", "time": {"live_span": "1h"}}));
//! assert_eq!(flatten_wire(FIELDS, &wire).unwrap(), config);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod build;
pub mod config;
pub mod error;
pub mod flatten;
pub mod path;
pub mod schema;
pub mod spec;
pub mod validate;
pub mod value;
pub mod visit;
pub mod wire;

pub use build::{build_field, build_wire};
pub use config::EngineConfig;
pub use error::{Error, Result, SpecDefect};
pub use flatten::{flatten_wire, resolve_variant, select_variant};
pub use path::{get_at_path, set_at_path};
pub use schema::{
    AttrType, Attribute, Block, PlanModifier, Schema, Validator, attr_type, attr_types,
    derive_schema, derive_schema_with,
};
pub use spec::{
    CustomValidator, DefaultValue, Discriminator, FieldKind, FieldSpec, FieldType, WidgetSpec,
};
pub use validate::{ValidationError, ValidationErrorKind, ValidationErrors, validate_config};
pub use value::{ConfigObject, ConfigValue};
pub use visit::{FieldVisitor, assert_valid_fields, check_fields, describe, walk};
