//! Error types for the mapping engine.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the mapping error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the mapping engine.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The wire value at `path` does not have the shape its field declares.
    #[error("Malformed wire value at `{path}`: expected {expected}, found {found}")]
    #[diagnostic(
        code(tfdash_mapping::malformed_wire),
        help("The API response does not match the field table for this resource")
    )]
    MalformedWire {
        /// Dotted configuration path of the offending field
        path: String,
        /// Shape the field table expects
        expected: &'static str,
        /// Shape found in the wire body
        found: &'static str,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    #[diagnostic(code(tfdash_mapping::json))]
    Json(#[from] serde_json::Error),

    /// Engine configuration could not be parsed.
    #[error("Invalid engine configuration: {0}")]
    #[diagnostic(
        code(tfdash_mapping::config),
        help("Known keys are custom_validators, promote_optional_computed and enrich_descriptions")
    )]
    Config(#[from] toml::de::Error),

    /// The configuration tree failed validation.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] crate::validate::ValidationErrors),
}

impl Error {
    /// Create a malformed wire error for `path`.
    #[must_use]
    pub fn malformed(path: impl Into<String>, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::MalformedWire {
            path: path.into(),
            expected,
            found: json_kind(found),
        }
    }
}

/// Short name of a JSON value's kind, used in error messages.
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A defect in a static field table.
///
/// These are programming errors in the tables, not user errors, so the engine
/// reports them by panicking when a table is first checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecDefect {
    /// Two siblings share a config key.
    #[error("duplicate config key `{key}` under `{parent}`")]
    DuplicateKey {
        /// Dotted path of the parent
        parent: String,
        /// Repeated key
        key: &'static str,
    },

    /// A one-of declares more than one default variant.
    #[error("one-of `{field}` declares more than one default variant")]
    MultipleDefaultVariants {
        /// Dotted path of the one-of
        field: String,
    },

    /// A one-of has no discriminated children.
    #[error("one-of `{field}` has no variants")]
    NoVariants {
        /// Dotted path of the one-of
        field: String,
    },

    /// A discriminated child of a one-of is not a block.
    #[error("variant `{variant}` of one-of `{field}` is not a block")]
    NonBlockVariant {
        /// Dotted path of the one-of
        field: String,
        /// Offending child key
        variant: &'static str,
    },

    /// Two variants of a one-of claim the same exact discriminator value.
    #[error("one-of `{field}` maps discriminator value `{value}` to more than one variant")]
    ConflictingDiscriminators {
        /// Dotted path of the one-of
        field: String,
        /// Value claimed twice
        value: &'static str,
    },

    /// A discriminator is set on a field outside a one-of.
    #[error("field `{field}` declares a discriminator but is not a child of a one-of")]
    StrayDiscriminator {
        /// Dotted path of the field
        field: String,
    },

    /// A nested kind has no children.
    #[error("field `{field}` is nested but has no children")]
    EmptyChildren {
        /// Dotted path of the field
        field: String,
    },
}
