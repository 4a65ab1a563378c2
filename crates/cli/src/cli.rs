use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Invalid dashboard configuration or body exit code
pub const EXIT_INVALID: i32 = 3;

/// CLI-specific error types with exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(tfdash::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// The dashboard configuration failed validation (exit code 3)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] tfdash_mapping::ValidationErrors),

    /// A dashboard body or configuration could not be read (exit code 3)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Dashboard(#[from] tfdash_dashboard::Error),

    /// Reading input or writing output failed (exit code 3)
    #[error("I/O error: {message}")]
    #[diagnostic(code(tfdash::cli::io))]
    Io {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an I/O error naming what was being done
    #[must_use]
    pub fn io(operation: &str, source: &io::Error) -> Self {
        Self::Io {
            message: format!("{operation}: {source}"),
            help: Some("Check file permissions and ensure the path exists".to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Dashboard(err.into())
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Invalid(_) | CliError::Dashboard(_) | CliError::Io { .. } => EXIT_INVALID,
    }
}

/// Render an error to stderr through miette
#[allow(clippy::print_stderr)]
pub fn render_error(err: CliError) {
    let report = Report::new(err);
    eprintln!("{report:?}");
    let _ = io::stderr().flush();
}

/// Build, flatten and validate Datadog dashboard definitions.
#[derive(Parser, Debug)]
#[command(name = "tfdash")]
#[command(about = "Build, flatten and validate Datadog dashboard definitions")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Engine configuration file (TOML).
    #[arg(long, short = 'c', global = true, env = "TFDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip escape-hatch validators attached to fields.
    #[arg(long, global = true)]
    pub no_custom_validators: bool,

    /// Use descriptions exactly as declared, without valid values and defaults.
    #[arg(long, global = true)]
    pub plain_descriptions: bool,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the derived schema as JSON.
    #[command(about = "Print the derived schema as JSON")]
    Schema {
        /// Only print the schema of one widget definition, e.g. `note_definition`
        #[arg(long)]
        widget: Option<String>,
    },

    /// Build the API request body from a configuration file.
    #[command(about = "Build the API request body from a configuration file")]
    Build {
        /// Configuration as JSON, `-` for stdin
        file: PathBuf,

        /// Dashboard ID to send with the body
        #[arg(long, default_value = "")]
        id: String,

        /// Build even when the configuration does not validate
        #[arg(long)]
        no_validate: bool,
    },

    /// Flatten an API response body into configuration.
    #[command(about = "Flatten an API response body into configuration")]
    Flatten {
        /// API response as JSON, `-` for stdin
        file: PathBuf,
    },

    /// Validate a configuration file.
    #[command(about = "Validate a configuration file")]
    Validate {
        /// Configuration as JSON, `-` for stdin
        file: PathBuf,
    },

    /// List the supported widget definitions.
    #[command(about = "List the supported widget definitions")]
    Widgets,
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
