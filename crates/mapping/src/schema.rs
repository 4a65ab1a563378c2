//! Schema derivation.
//!
//! Turns a field table into the attribute/block schema a resource exposes,
//! plus the typed attribute-value model used to check configuration shapes.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::instrument;

use crate::config::EngineConfig;
use crate::spec::{DefaultValue, FieldKind, FieldSpec, FieldType};
use crate::value::ConfigValue;
use crate::visit::{assert_valid_fields, describe};

/// Schema of one resource or nested block.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    /// Scalar and list attributes by config key
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested blocks by config key
    pub blocks: BTreeMap<String, Block>,
}

impl Schema {
    /// Merge `other` into `self`. Entries of `other` win on key collisions.
    pub fn extend(&mut self, other: Self) {
        self.attributes.extend(other.attributes);
        self.blocks.extend(other.blocks);
    }

    /// Whether the schema has an attribute or block named `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key) || self.blocks.contains_key(key)
    }
}

/// A scalar or list attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Value type
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    /// Description shown in documentation
    pub description: String,
    /// Must be set in configuration
    pub required: bool,
    /// May be set in configuration
    pub optional: bool,
    /// May be filled in by the provider
    pub computed: bool,
    /// Hidden from plan output
    pub sensitive: bool,
    /// Deprecation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    /// Static default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Validators run on the value
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// Plan modifiers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
}

/// A nested block. Blocks are always lists in configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Description shown in documentation
    pub description: String,
    /// Deprecation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    /// Validators run on the block list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// Plan modifiers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
    /// Schema of each element
    pub nested: Schema,
}

/// Validator attached to an attribute or block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// String value must be one of `values`
    OneOf {
        /// Allowed values
        values: Vec<String>,
    },
    /// Every list element must be one of `values`
    ValuesOneOf {
        /// Allowed values
        values: Vec<String>,
    },
    /// List may hold at most `max` elements
    SizeAtMost {
        /// Upper bound
        max: usize,
    },
    /// Block must be present
    IsRequired,
    /// Exactly one of the named variant blocks must be populated
    ExactlyOneVariant {
        /// Variant block keys
        variants: Vec<String>,
    },
    /// May not be set together with the named paths
    ConflictsWith {
        /// Conflicting config paths
        paths: Vec<String>,
    },
    /// Escape-hatch validator attached to the field
    Custom,
}

/// Plan modifier attached to an attribute or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Changing the value replaces the resource
    RequiresReplace,
    /// Keep the prior state value when the plan has none
    UseStateForUnknown,
}

/// Typed attribute-value model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    /// Text
    String,
    /// Boolean
    Bool,
    /// 64-bit integer
    Int64,
    /// 64-bit float
    Float64,
    /// Ordered list
    List(Box<AttrType>),
    /// Unordered set
    Set(Box<AttrType>),
    /// Object with typed members
    Object(BTreeMap<String, AttrType>),
}

impl AttrType {
    /// Whether `value` has this type's outer shape.
    ///
    /// Null and unknown fit every type. Lists check their elements one level
    /// down; object members are not inspected.
    #[must_use]
    pub fn admits(&self, value: &ConfigValue) -> bool {
        match (self, value) {
            (_, ConfigValue::Null | ConfigValue::Unknown)
            | (Self::String, ConfigValue::String(_))
            | (Self::Bool, ConfigValue::Bool(_))
            | (Self::Int64, ConfigValue::Int(_))
            | (Self::Float64, ConfigValue::Int(_) | ConfigValue::Float(_))
            | (Self::Object(_), ConfigValue::Object(_)) => true,
            (Self::List(elem) | Self::Set(elem), ConfigValue::List(items)) => {
                items.iter().all(|item| elem.admits_shallow(item))
            }
            _ => false,
        }
    }

    fn admits_shallow(&self, value: &ConfigValue) -> bool {
        match self {
            Self::List(_) | Self::Set(_) => {
                matches!(value, ConfigValue::List(_) | ConfigValue::Null | ConfigValue::Unknown)
            }
            _ => self.admits(value),
        }
    }

    /// Short name for messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Object(_) => "object",
        }
    }
}

/// Typed attribute-value model of a field.
#[must_use]
pub fn attr_type(field: &FieldSpec) -> AttrType {
    match field.kind {
        FieldKind::String => AttrType::String,
        FieldKind::Bool => AttrType::Bool,
        FieldKind::Int => AttrType::Int64,
        FieldKind::Float => AttrType::Float64,
        FieldKind::StringList => AttrType::List(Box::new(AttrType::String)),
        FieldKind::IntList if field.use_set => AttrType::Set(Box::new(AttrType::Int64)),
        FieldKind::IntList => AttrType::List(Box::new(AttrType::Int64)),
        FieldKind::Block(children)
        | FieldKind::BlockList(children)
        | FieldKind::OneOf { children, .. } => {
            AttrType::List(Box::new(AttrType::Object(attr_types(children))))
        }
    }
}

/// Typed attribute-value model of a table, keyed by config key.
#[must_use]
pub fn attr_types(fields: &[FieldSpec]) -> BTreeMap<String, AttrType> {
    fields
        .iter()
        .map(|f| (f.config_key.to_string(), attr_type(f)))
        .collect()
}

/// Derive the schema of `fields` with the default engine configuration.
///
/// # Panics
///
/// When the table is malformed (duplicate keys, bad one-of variants).
#[must_use]
pub fn derive_schema(fields: &[FieldSpec]) -> Schema {
    derive_schema_with(&EngineConfig::default(), fields)
}

/// Derive the schema of `fields`.
///
/// # Panics
///
/// When the table is malformed (duplicate keys, bad one-of variants).
#[must_use]
#[instrument(name = "derive_schema", skip_all, fields(count = fields.len()))]
pub fn derive_schema_with(config: &EngineConfig, fields: &[FieldSpec]) -> Schema {
    assert_valid_fields(fields);
    derive(config, fields)
}

fn derive(config: &EngineConfig, fields: &[FieldSpec]) -> Schema {
    let mut schema = Schema::default();
    for field in fields {
        let key = field.config_key.to_string();
        if field.field_type().is_nested() {
            schema.blocks.insert(key, derive_block(config, field));
        } else {
            schema.attributes.insert(key, derive_attribute(config, field));
        }
    }
    schema
}

fn description(config: &EngineConfig, field: &FieldSpec) -> String {
    if config.enrich_descriptions {
        describe(field)
    } else {
        field.description.to_string()
    }
}

fn common_validators(config: &EngineConfig, field: &FieldSpec) -> Vec<Validator> {
    let mut validators = Vec::new();
    if !field.conflicts_with.is_empty() {
        validators.push(Validator::ConflictsWith {
            paths: to_strings(field.conflicts_with),
        });
    }
    if config.custom_validators && field.validator.is_some() {
        validators.push(Validator::Custom);
    }
    validators
}

fn derive_attribute(config: &EngineConfig, field: &FieldSpec) -> Attribute {
    let ty = field.field_type();
    let default = field.default.filter(|d| d.fits(ty));
    let required = field.required;
    let mut computed = field.computed || default.is_some();
    let mut plan_modifiers = Vec::new();
    let mut validators = Vec::new();

    if field.force_new {
        plan_modifiers.push(PlanModifier::RequiresReplace);
    }
    let promote = config.promote_optional_computed
        && !required
        && !field.computed
        && default.is_none()
        && matches!(ty, FieldType::String | FieldType::Bool);
    if promote {
        computed = true;
        plan_modifiers.push(PlanModifier::UseStateForUnknown);
    }

    match ty {
        FieldType::String if !field.valid_values.is_empty() => {
            validators.push(Validator::OneOf {
                values: to_strings(field.valid_values),
            });
        }
        FieldType::StringList => {
            if field.max_items > 0 {
                validators.push(Validator::SizeAtMost {
                    max: field.max_items,
                });
            }
            if !field.valid_values.is_empty() {
                validators.push(Validator::ValuesOneOf {
                    values: to_strings(field.valid_values),
                });
            }
        }
        FieldType::IntList if field.max_items > 0 => {
            validators.push(Validator::SizeAtMost {
                max: field.max_items,
            });
        }
        _ => {}
    }
    validators.extend(common_validators(config, field));

    Attribute {
        attr_type: attr_type(field),
        description: description(config, field),
        required,
        optional: !required,
        computed,
        sensitive: field.sensitive,
        deprecation_message: field.deprecated.map(str::to_string),
        default,
        validators,
        plan_modifiers,
    }
}

fn derive_block(config: &EngineConfig, field: &FieldSpec) -> Block {
    let mut validators = Vec::new();
    let mut nested = derive(config, field.children());
    match field.kind {
        FieldKind::Block(_) => validators.push(Validator::SizeAtMost { max: 1 }),
        FieldKind::BlockList(_) if field.max_items > 0 => {
            validators.push(Validator::SizeAtMost {
                max: field.max_items,
            });
        }
        FieldKind::OneOf { children, .. } => {
            validators.push(Validator::SizeAtMost { max: 1 });
            let variants: Vec<String> = children
                .iter()
                .filter(|c| c.is_variant())
                .map(|c| c.config_key.to_string())
                .collect();
            for variant in &variants {
                if let Some(block) = nested.blocks.get_mut(variant) {
                    block.validators.retain(|v| *v != Validator::IsRequired);
                }
            }
            validators.push(Validator::ExactlyOneVariant { variants });
        }
        _ => {}
    }
    if field.required {
        validators.push(Validator::IsRequired);
    }
    validators.extend(common_validators(config, field));

    let mut plan_modifiers = Vec::new();
    if field.force_new {
        plan_modifiers.push(PlanModifier::RequiresReplace);
    }

    Block {
        description: description(config, field),
        deprecation_message: field.deprecated.map(str::to_string),
        validators,
        plan_modifiers,
        nested,
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
