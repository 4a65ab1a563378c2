//! Field and widget declarations.
//!
//! A [`FieldSpec`] describes one configuration field once: its config key, where
//! it lives in the JSON body, its shape, and its schema metadata. Tables are
//! plain `static` slices assembled with the `const fn` builders below:
//!
//! ```
//! use tfdash_mapping::{Discriminator, FieldSpec};
//!
//! static CANONICAL: &[FieldSpec] = &[
//!     FieldSpec::string("unit_name").required(),
//!     FieldSpec::string("per_unit_name").omit_if_zero(),
//! ];
//! static CUSTOM: &[FieldSpec] = &[FieldSpec::string("label").required()];
//! static UNIT: &[FieldSpec] = &[
//!     FieldSpec::block("canonical", CANONICAL).variant(Discriminator::Exact("canonical_unit")),
//!     FieldSpec::block("custom", CUSTOM).variant(Discriminator::Exact("custom_unit_label")),
//! ];
//! static NUMBER_FORMAT: &[FieldSpec] = &[FieldSpec::one_of("unit", "type", UNIT)];
//!
//! assert_eq!(NUMBER_FORMAT[0].children().len(), 2);
//! ```

use serde::Serialize;

use crate::value::ConfigValue;

/// Shape tag of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text scalar
    String,
    /// Boolean scalar
    Bool,
    /// Integer scalar
    Int,
    /// Floating point scalar
    Float,
    /// List of strings
    StringList,
    /// List of integers
    IntList,
    /// Single nested object
    Block,
    /// Repeated nested object
    BlockList,
    /// Discriminated union of nested objects
    OneOf,
}

impl FieldType {
    /// Whether the field nests other fields.
    #[must_use]
    pub const fn is_nested(self) -> bool {
        matches!(self, Self::Block | Self::BlockList | Self::OneOf)
    }
}

/// Shape of a field together with the payload that shape needs.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Text scalar
    String,
    /// Boolean scalar
    Bool,
    /// Integer scalar
    Int,
    /// Floating point scalar
    Float,
    /// List of strings
    StringList,
    /// List of integers
    IntList,
    /// Single nested object
    Block(&'static [FieldSpec]),
    /// Repeated nested object
    BlockList(&'static [FieldSpec]),
    /// Discriminated union of nested objects
    OneOf {
        /// Wire key holding the discriminator inside the union's object
        discriminator_key: &'static str,
        /// Variant blocks and common attributes
        children: &'static [FieldSpec],
    },
}

/// How a one-of variant is recognised in a wire body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    /// Selected when the discriminator equals the value. The value is written
    /// back into the wire body when the variant is built.
    Exact(&'static str),
    /// Selected when the discriminator is any of the values. Nothing is
    /// injected on build, the variant's own fields carry the value.
    AnyOf(&'static [&'static str]),
    /// Fallback when nothing else matches.
    Default,
}

impl Discriminator {
    /// The value injected into the wire body when this variant is built.
    #[must_use]
    pub const fn injected_value(self) -> Option<&'static str> {
        match self {
            Self::Exact(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Whether this is an exact match on `value`.
    #[must_use]
    pub fn matches_exact(self, value: &str) -> bool {
        matches!(self, Self::Exact(expected) if expected == value)
    }

    /// Whether `value` belongs to this variant's value set.
    #[must_use]
    pub fn matches_any(self, value: &str) -> bool {
        matches!(self, Self::AnyOf(values) if values.contains(&value))
    }
}

/// Static default of an optional scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Default for a string field
    String(&'static str),
    /// Default for a bool field
    Bool(bool),
    /// Default for an int field
    Int(i64),
    /// Default for a float field
    Float(f64),
}

impl DefaultValue {
    /// Whether the default fits a field of type `ty`.
    #[must_use]
    pub const fn fits(self, ty: FieldType) -> bool {
        matches!(
            (self, ty),
            (Self::String(_), FieldType::String)
                | (Self::Bool(_), FieldType::Bool)
                | (Self::Int(_), FieldType::Int)
                | (Self::Float(_) | Self::Int(_), FieldType::Float)
        )
    }

    /// Render for human readable descriptions.
    #[must_use]
    pub fn render(self) -> String {
        match self {
            Self::String(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
        }
    }
}

impl From<DefaultValue> for ConfigValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::String(v) => Self::from(v),
            DefaultValue::Bool(v) => Self::Bool(v),
            DefaultValue::Int(v) => Self::Int(v),
            DefaultValue::Float(v) => Self::Float(v),
        }
    }
}

/// Escape-hatch validator for rules a table cannot express.
///
/// Returns a message describing the violation.
pub type CustomValidator = fn(&ConfigValue) -> std::result::Result<(), String>;

/// Declaration of one configuration field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the configuration tree
    pub config_key: &'static str,
    /// Key in the wire body when it differs from `config_key`
    pub wire_key: Option<&'static str>,
    /// Dotted wire path, takes precedence over `wire_key`
    pub wire_path: Option<&'static str>,
    /// Shape and nested fields
    pub kind: FieldKind,
    /// Leave zero values out of the wire body
    pub omit_if_zero: bool,
    /// Must be set in configuration
    pub required: bool,
    /// May be filled in by the API
    pub computed: bool,
    /// Static default for optional scalars
    pub default: Option<DefaultValue>,
    /// Upper bound for lists, zero for unbounded
    pub max_items: usize,
    /// Hide the value from logs and plans
    pub sensitive: bool,
    /// Deprecation message
    pub deprecated: Option<&'static str>,
    /// Allowed string values
    pub valid_values: &'static [&'static str],
    /// Config paths that may not be set together with this field
    pub conflicts_with: &'static [&'static str],
    /// Unordered collection semantics
    pub use_set: bool,
    /// Changing the value replaces the resource
    pub force_new: bool,
    /// Registered in the schema only; build and flatten skip it
    pub schema_only: bool,
    /// Human readable description
    pub description: &'static str,
    /// Set on one-of variants
    pub variant: Option<Discriminator>,
    /// Optional escape-hatch validator
    pub validator: Option<CustomValidator>,
}

impl FieldSpec {
    const fn base(config_key: &'static str, kind: FieldKind) -> Self {
        Self {
            config_key,
            wire_key: None,
            wire_path: None,
            kind,
            omit_if_zero: false,
            required: false,
            computed: false,
            default: None,
            max_items: 0,
            sensitive: false,
            deprecated: None,
            valid_values: &[],
            conflicts_with: &[],
            use_set: false,
            force_new: false,
            schema_only: false,
            description: "",
            variant: None,
            validator: None,
        }
    }

    /// A string field.
    #[must_use]
    pub const fn string(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::String)
    }

    /// A bool field.
    #[must_use]
    pub const fn boolean(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::Bool)
    }

    /// An int field.
    #[must_use]
    pub const fn int(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::Int)
    }

    /// A float field.
    #[must_use]
    pub const fn float(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::Float)
    }

    /// A list of strings.
    #[must_use]
    pub const fn string_list(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::StringList)
    }

    /// A list of integers.
    #[must_use]
    pub const fn int_list(config_key: &'static str) -> Self {
        Self::base(config_key, FieldKind::IntList)
    }

    /// A single nested object.
    #[must_use]
    pub const fn block(config_key: &'static str, children: &'static [Self]) -> Self {
        assert!(!children.is_empty(), "block fields need children");
        Self::base(config_key, FieldKind::Block(children))
    }

    /// A repeated nested object.
    #[must_use]
    pub const fn block_list(config_key: &'static str, children: &'static [Self]) -> Self {
        assert!(!children.is_empty(), "block list fields need children");
        Self::base(config_key, FieldKind::BlockList(children))
    }

    /// A discriminated union. Children carrying a [`Discriminator`] are the
    /// variants, the rest are attributes shared by every variant.
    #[must_use]
    pub const fn one_of(
        config_key: &'static str,
        discriminator_key: &'static str,
        children: &'static [Self],
    ) -> Self {
        assert!(!children.is_empty(), "one-of fields need variants");
        Self::base(
            config_key,
            FieldKind::OneOf {
                discriminator_key,
                children,
            },
        )
    }

    /// Use a different key in the wire body.
    #[must_use]
    pub const fn wire_key(mut self, key: &'static str) -> Self {
        self.wire_key = Some(key);
        self
    }

    /// Place the value at a dotted wire path.
    #[must_use]
    pub const fn wire_path(mut self, path: &'static str) -> Self {
        self.wire_path = Some(path);
        self
    }

    /// Leave zero values out of the wire body.
    #[must_use]
    pub const fn omit_if_zero(mut self) -> Self {
        self.omit_if_zero = true;
        self
    }

    /// Require the field in configuration.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Let the API fill the field in.
    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Static default for an optional scalar.
    #[must_use]
    pub const fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Upper bound on list length.
    #[must_use]
    pub const fn max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    /// Hide the value from logs and plans.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Mark the field deprecated.
    #[must_use]
    pub const fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    /// Restrict string values.
    #[must_use]
    pub const fn valid_values(mut self, values: &'static [&'static str]) -> Self {
        self.valid_values = values;
        self
    }

    /// Config paths that may not be set together with this field.
    #[must_use]
    pub const fn conflicts_with(mut self, paths: &'static [&'static str]) -> Self {
        self.conflicts_with = paths;
        self
    }

    /// Unordered collection.
    #[must_use]
    pub const fn use_set(mut self) -> Self {
        self.use_set = true;
        self
    }

    /// Replace the resource when the value changes.
    #[must_use]
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Register in the schema only.
    #[must_use]
    pub const fn schema_only(mut self) -> Self {
        self.schema_only = true;
        self
    }

    /// Human readable description.
    #[must_use]
    pub const fn description(mut self, text: &'static str) -> Self {
        self.description = text;
        self
    }

    /// Mark a one-of child as a variant.
    #[must_use]
    pub const fn variant(mut self, discriminator: Discriminator) -> Self {
        self.variant = Some(discriminator);
        self
    }

    /// Attach an escape-hatch validator.
    #[must_use]
    pub const fn validator(mut self, validator: CustomValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Shape tag.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self.kind {
            FieldKind::String => FieldType::String,
            FieldKind::Bool => FieldType::Bool,
            FieldKind::Int => FieldType::Int,
            FieldKind::Float => FieldType::Float,
            FieldKind::StringList => FieldType::StringList,
            FieldKind::IntList => FieldType::IntList,
            FieldKind::Block(_) => FieldType::Block,
            FieldKind::BlockList(_) => FieldType::BlockList,
            FieldKind::OneOf { .. } => FieldType::OneOf,
        }
    }

    /// Nested fields, empty for scalars and lists.
    #[must_use]
    pub const fn children(&self) -> &'static [Self] {
        match self.kind {
            FieldKind::Block(children)
            | FieldKind::BlockList(children)
            | FieldKind::OneOf { children, .. } => children,
            _ => &[],
        }
    }

    /// Whether this field is a one-of variant.
    #[must_use]
    pub const fn is_variant(&self) -> bool {
        self.variant.is_some()
    }
}

/// Declaration of one widget type.
#[derive(Debug, Clone, Copy)]
pub struct WidgetSpec {
    /// Definition block key in configuration, e.g. `timeseries_definition`
    pub config_key: &'static str,
    /// Value of the definition's `type` in the wire body
    pub wire_type: &'static str,
    /// Human readable description
    pub description: &'static str,
    /// Widget specific fields
    pub fields: &'static [FieldSpec],
}

impl WidgetSpec {
    /// Declare a widget.
    #[must_use]
    pub const fn new(
        config_key: &'static str,
        wire_type: &'static str,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            config_key,
            wire_type,
            description: "",
            fields,
        }
    }

    /// Human readable description.
    #[must_use]
    pub const fn description(mut self, text: &'static str) -> Self {
        self.description = text;
        self
    }
}
