//! Error types for the dashboard layer.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the dashboard error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while building or reading dashboards.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The mapping engine rejected a value.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mapping(#[from] tfdash_mapping::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    #[diagnostic(code(tfdash_dashboard::json))]
    Json(#[from] serde_json::Error),

    /// A dashboard body is not a JSON object.
    #[error("Dashboard body must be a JSON object, found {found}")]
    #[diagnostic(
        code(tfdash_dashboard::invalid_body),
        help("Pass the object returned by the dashboard API, not an array or scalar")
    )]
    InvalidBody {
        /// Kind of the value found
        found: &'static str,
    },
}

impl Error {
    /// Create an invalid body error for `value`.
    #[must_use]
    pub const fn invalid_body(value: &serde_json::Value) -> Self {
        Self::InvalidBody {
            found: tfdash_mapping::error::json_kind(value),
        }
    }
}
