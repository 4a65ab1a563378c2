//! Engine configuration for a CLI run: the TOML file, then flag overrides.

use std::fs;
use std::path::Path;

use tfdash_mapping::EngineConfig;
use tracing::debug;

use crate::cli::{Cli, CliError};

/// Load the engine configuration from `path`, or the defaults when `None`.
///
/// # Errors
///
/// Returns a configuration error when the file cannot be read or parsed.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let source = fs::read_to_string(path).map_err(|e| {
        CliError::config_with_help(
            format!("Failed to read {}: {e}", path.display()),
            "Pass an existing file with --config or TFDASH_CONFIG",
        )
    })?;
    let config = EngineConfig::from_toml(&source).map_err(|e| {
        CliError::config_with_help(
            format!("Invalid engine configuration in {}: {e}", path.display()),
            "Known keys are custom_validators, promote_optional_computed and enrich_descriptions",
        )
    })?;
    debug!(path = %path.display(), ?config, "loaded engine configuration");
    Ok(config)
}

/// Engine configuration for `cli`: the configured file with flags applied on top.
///
/// # Errors
///
/// Returns a configuration error when the file cannot be read or parsed.
pub fn resolve(cli: &Cli) -> Result<EngineConfig, CliError> {
    let mut config = load_engine_config(cli.config.as_deref())?;
    if cli.no_custom_validators {
        config.custom_validators = false;
    }
    if cli.plain_descriptions {
        config.enrich_descriptions = false;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_path_gives_defaults() {
        assert_eq!(load_engine_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_file_values_are_loaded() {
        let file = write_config("custom_validators = false\n");
        let config = load_engine_config(Some(file.path())).unwrap();
        assert!(!config.custom_validators);
        assert!(config.promote_optional_computed);
    }

    #[test]
    fn test_unknown_key_is_a_config_error() {
        let file = write_config("strict = true\n");
        let err = load_engine_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_unreadable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_engine_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_flags_override_file() {
        let file = write_config("enrich_descriptions = true\n");
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "tfdash",
            "--config",
            path.as_str(),
            "--plain-descriptions",
            "--no-custom-validators",
            "widgets",
        ])
        .unwrap();
        let config = resolve(&cli).unwrap();
        assert!(!config.enrich_descriptions);
        assert!(!config.custom_validators);
    }
}
