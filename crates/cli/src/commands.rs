//! Command implementations. Each writes its result to the given writer.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tfdash_dashboard::{
    WIDGETS, build_dashboard, by_config_key, dashboard_schema, definition_schema,
    flatten_dashboard, validate_dashboard,
};
use tfdash_mapping::value::object_from_json;
use tfdash_mapping::{ConfigObject, ConfigValue, EngineConfig};
use tracing::{info, instrument};

use crate::cli::{Cli, CliError, Commands};
use crate::settings;

/// Run the parsed command line, writing output to `out`.
///
/// # Errors
///
/// Returns the first error of the command.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let config = settings::resolve(cli)?;
    match &cli.command {
        Commands::Schema { widget } => schema(&config, widget.as_deref(), out),
        Commands::Build {
            file,
            id,
            no_validate,
        } => build(&config, file, id, *no_validate, out),
        Commands::Flatten { file } => flatten(file, out),
        Commands::Validate { file } => validate(&config, file, out),
        Commands::Widgets => widgets(out),
    }
}

/// Print the dashboard schema, or one widget definition's.
///
/// # Errors
///
/// Returns a configuration error for an unknown widget key.
pub fn schema(
    config: &EngineConfig,
    widget: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let schema = match widget {
        Some(key) => {
            let spec = by_config_key(key).ok_or_else(|| {
                CliError::config_with_help(
                    format!("Unknown widget definition `{key}`"),
                    "Run `tfdash widgets` to list the supported definitions",
                )
            })?;
            definition_schema(config, spec)
        }
        None => dashboard_schema(config),
    };
    let text = serde_json::to_string_pretty(&schema)?;
    writeln!(out, "{text}").map_err(|e| CliError::io("writing schema", &e))
}

/// Validate and build a configuration file into an API request body.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not a JSON object, or
/// fails validation while `no_validate` is off.
#[instrument(name = "build", skip(config, out))]
pub fn build(
    config: &EngineConfig,
    file: &Path,
    id: &str,
    no_validate: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let dashboard = read_config(file)?;
    if !no_validate {
        validate_dashboard(config, &dashboard)?;
    }
    let body = build_dashboard(&dashboard, id);
    let text = serde_json::to_string(&body)?;
    writeln!(out, "{text}").map_err(|e| CliError::io("writing body", &e))
}

/// Flatten an API response body into configuration.
///
/// # Errors
///
/// Returns an error when the file cannot be read or a known field is malformed.
#[instrument(name = "flatten", skip(out))]
pub fn flatten(file: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let body = read_object(file)?;
    let dashboard = flatten_dashboard(&body)?;
    let value = Value::from(&ConfigValue::Object(dashboard));
    let text = serde_json::to_string_pretty(&value)?;
    writeln!(out, "{text}").map_err(|e| CliError::io("writing configuration", &e))
}

/// Validate a configuration file.
///
/// # Errors
///
/// Returns every validation problem when the configuration is invalid.
#[instrument(name = "validate", skip(config, out))]
pub fn validate(config: &EngineConfig, file: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let dashboard = read_config(file)?;
    validate_dashboard(config, &dashboard)?;
    info!("configuration is valid");
    writeln!(out, "{}: configuration is valid", file.display())
        .map_err(|e| CliError::io("writing result", &e))
}

/// List the supported widget definitions.
///
/// # Errors
///
/// Returns an error when writing fails.
pub fn widgets(out: &mut impl Write) -> Result<(), CliError> {
    let width = WIDGETS
        .iter()
        .map(|w| w.config_key.len())
        .max()
        .unwrap_or_default();
    for widget in WIDGETS {
        writeln!(
            out,
            "{:width$}  {:16}  {}",
            widget.config_key, widget.wire_type, widget.description
        )
        .map_err(|e| CliError::io("writing widget list", &e))?;
    }
    Ok(())
}

fn read_config(file: &Path) -> Result<ConfigObject, CliError> {
    read_object(file).map(object_from_json)
}

fn read_object(file: &Path) -> Result<Map<String, Value>, CliError> {
    let source = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::io("reading stdin", &e))?;
        buf
    } else {
        fs::read_to_string(file)
            .map_err(|e| CliError::io(&format!("reading {}", file.display()), &e))?
    };
    match serde_json::from_str(&source)? {
        Value::Object(obj) => Ok(obj),
        other => Err(tfdash_dashboard::Error::invalid_body(&other).into()),
    }
}
