//! Configuration validation.
//!
//! Runs before any request is built, so a bad configuration is reported with
//! every problem at once instead of as an opaque API rejection.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::path::join;
use crate::schema::attr_type;
use crate::spec::{FieldKind, FieldSpec};
use crate::value::{ConfigObject, ConfigValue};

/// Kind of a [`ValidationError`], for callers that match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// String outside its allowed values
    InvalidEnum,
    /// More than one one-of variant populated
    ConflictingVariants,
    /// One-of block present without a variant
    MissingVariant,
    /// Required field unset
    MissingRequired,
    /// List longer than allowed
    TooManyItems,
    /// Value shape does not match the field
    TypeMismatch,
    /// Escape-hatch validator failed
    Custom,
}

/// A single configuration problem.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ValidationError {
    /// Value outside `valid_values`.
    #[error("{path}: invalid value `{value}`, expected one of: {}", .allowed.join(", "))]
    #[diagnostic(code(tfdash_mapping::invalid_enum))]
    InvalidEnum {
        /// Dotted config path
        path: String,
        /// Offending value
        value: String,
        /// Allowed values
        allowed: Vec<String>,
    },

    /// Several variants of a one-of are populated.
    #[error("{path}: only one of {} may be set", .variants.join(", "))]
    #[diagnostic(
        code(tfdash_mapping::conflicting_variants),
        help("Keep exactly one variant block")
    )]
    ConflictingVariants {
        /// Dotted config path of the one-of
        path: String,
        /// Populated variants
        variants: Vec<String>,
    },

    /// A one-of block is present but no variant is populated.
    #[error("{path}: one of {} must be set", .variants.join(", "))]
    #[diagnostic(
        code(tfdash_mapping::missing_variant),
        help("Add exactly one variant block")
    )]
    MissingVariant {
        /// Dotted config path of the one-of
        path: String,
        /// All variants
        variants: Vec<String>,
    },

    /// A required field is unset.
    #[error("{path}: required value is missing")]
    #[diagnostic(code(tfdash_mapping::missing_required))]
    MissingRequired {
        /// Dotted config path
        path: String,
    },

    /// A list holds more elements than allowed.
    #[error("{path}: at most {max} item(s) allowed, found {found}")]
    #[diagnostic(code(tfdash_mapping::too_many_items))]
    TooManyItems {
        /// Dotted config path
        path: String,
        /// Upper bound
        max: usize,
        /// Actual length
        found: usize,
    },

    /// The value's shape does not match the field type.
    #[error("{path}: expected {expected}, found {found}")]
    #[diagnostic(code(tfdash_mapping::type_mismatch))]
    TypeMismatch {
        /// Dotted config path
        path: String,
        /// Expected attribute type
        expected: &'static str,
        /// Kind of the value found
        found: &'static str,
    },

    /// An escape-hatch validator rejected the value.
    #[error("{path}: {message}")]
    #[diagnostic(code(tfdash_mapping::custom))]
    Custom {
        /// Dotted config path
        path: String,
        /// Validator message
        message: String,
    },
}

impl ValidationError {
    /// Dotted config path of the problem.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidEnum { path, .. }
            | Self::ConflictingVariants { path, .. }
            | Self::MissingVariant { path, .. }
            | Self::MissingRequired { path }
            | Self::TooManyItems { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::Custom { path, .. } => path,
        }
    }

    /// Kind of the problem.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidEnum { .. } => ValidationErrorKind::InvalidEnum,
            Self::ConflictingVariants { .. } => ValidationErrorKind::ConflictingVariants,
            Self::MissingVariant { .. } => ValidationErrorKind::MissingVariant,
            Self::MissingRequired { .. } => ValidationErrorKind::MissingRequired,
            Self::TooManyItems { .. } => ValidationErrorKind::TooManyItems,
            Self::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            Self::Custom { .. } => ValidationErrorKind::Custom,
        }
    }
}

/// Every problem found in one configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("configuration is invalid ({} problem(s))", .errors.len())]
#[diagnostic(code(tfdash_mapping::invalid_config))]
pub struct ValidationErrors {
    /// Individual problems, in traversal order
    #[related]
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Ok when `errors` is empty.
    ///
    /// # Errors
    ///
    /// Returns `self` wrapped when any error was collected.
    pub fn into_result(errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }
}

/// Validate a configuration object against `fields`.
///
/// Unknown values are skipped, they are checked again once known.
///
/// # Errors
///
/// Returns every problem found.
#[instrument(name = "validate_config", skip_all)]
pub fn validate_config(
    config: &EngineConfig,
    fields: &[FieldSpec],
    value: &ConfigObject,
) -> std::result::Result<(), ValidationErrors> {
    let errors = collect_errors(config, "", fields, value);
    if !errors.is_empty() {
        debug!(count = errors.len(), "configuration failed validation");
    }
    ValidationErrors::into_result(errors)
}

/// Problems in `value` with paths relative to `parent`.
#[must_use]
pub fn collect_errors(
    config: &EngineConfig,
    parent: &str,
    fields: &[FieldSpec],
    value: &ConfigObject,
) -> Vec<ValidationError> {
    let mut validator = Validator {
        config,
        errors: Vec::new(),
    };
    validator.check_fields(parent, fields, value);
    validator.errors
}

struct Validator<'c> {
    config: &'c EngineConfig,
    errors: Vec<ValidationError>,
}

impl Validator<'_> {
    fn check_fields(&mut self, parent: &str, fields: &[FieldSpec], obj: &ConfigObject) {
        for field in fields {
            let path = join(parent, field.config_key);
            match obj.get(field.config_key) {
                Some(ConfigValue::Unknown) => {}
                None | Some(ConfigValue::Null) => {
                    if field.required && field.default.is_none() && !field.computed {
                        self.errors.push(ValidationError::MissingRequired { path });
                    }
                }
                Some(value) => self.check_value(&path, field, value),
            }
        }
    }

    fn check_value(&mut self, path: &str, field: &FieldSpec, value: &ConfigValue) {
        let ty = attr_type(field);
        if !ty.admits(value) {
            self.errors.push(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: ty.name(),
                found: value.kind_name(),
            });
            return;
        }

        match field.kind {
            FieldKind::String => {
                if let Some(s) = value.as_str() {
                    self.check_enum(path, field, s);
                }
            }
            FieldKind::StringList => {
                let items = value.as_list().unwrap_or_default();
                self.check_len(path, field.max_items, items.len());
                for s in items.iter().filter_map(ConfigValue::as_str) {
                    self.check_enum(path, field, s);
                }
            }
            FieldKind::IntList => {
                self.check_len(path, field.max_items, value.as_list().map_or(0, <[_]>::len));
            }
            FieldKind::Block(children) => {
                let items = value.as_list().unwrap_or_default();
                self.check_len(path, 1, items.len());
                if let Some(obj) = items.first().and_then(ConfigValue::as_object) {
                    self.check_fields(path, children, obj);
                }
            }
            FieldKind::BlockList(children) => {
                let items = value.as_list().unwrap_or_default();
                self.check_len(path, field.max_items, items.len());
                for (i, obj) in items.iter().enumerate() {
                    if let Some(obj) = obj.as_object() {
                        self.check_fields(&format!("{path}[{i}]"), children, obj);
                    }
                }
            }
            FieldKind::OneOf { children, .. } => {
                let items = value.as_list().unwrap_or_default();
                self.check_len(path, 1, items.len());
                if let Some(obj) = items.first().and_then(ConfigValue::as_object) {
                    self.check_variants(path, children, obj);
                    self.check_fields(path, children, obj);
                }
            }
            FieldKind::Bool | FieldKind::Int | FieldKind::Float => {}
        }

        if self.config.custom_validators {
            if let Some(check) = field.validator {
                if let Err(message) = check(value) {
                    self.errors.push(ValidationError::Custom {
                        path: path.to_string(),
                        message,
                    });
                }
            }
        }
    }

    fn check_variants(&mut self, path: &str, children: &'static [FieldSpec], obj: &ConfigObject) {
        let variants = children.iter().filter(|c| c.is_variant());
        let populated: Vec<String> = variants
            .clone()
            .filter(|c| obj.get(c.config_key).and_then(ConfigValue::block_object).is_some())
            .map(|c| c.config_key.to_string())
            .collect();
        match populated.len() {
            1 => {}
            0 => {
                // A still-unknown variant may turn out to be the populated one.
                let pending = variants
                    .clone()
                    .any(|c| matches!(obj.get(c.config_key), Some(ConfigValue::Unknown)));
                if !pending {
                    self.errors.push(ValidationError::MissingVariant {
                        path: path.to_string(),
                        variants: variants.map(|c| c.config_key.to_string()).collect(),
                    });
                }
            }
            _ => self.errors.push(ValidationError::ConflictingVariants {
                path: path.to_string(),
                variants: populated,
            }),
        }
    }

    fn check_enum(&mut self, path: &str, field: &FieldSpec, value: &str) {
        if !field.valid_values.is_empty() && !field.valid_values.contains(&value) {
            self.errors.push(ValidationError::InvalidEnum {
                path: path.to_string(),
                value: value.to_string(),
                allowed: field.valid_values.iter().map(|v| (*v).to_string()).collect(),
            });
        }
    }

    fn check_len(&mut self, path: &str, max: usize, found: usize) {
        if max > 0 && found > max {
            self.errors.push(ValidationError::TooManyItems {
                path: path.to_string(),
                max,
                found,
            });
        }
    }
}
