//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Switches that change how the engine derives schemas and validates.
///
/// ```toml
/// custom_validators = true
/// promote_optional_computed = true
/// enrich_descriptions = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Run escape-hatch validators attached to fields
    pub custom_validators: bool,
    /// Make optional string and bool attributes without a default also
    /// computed, keeping the prior state value when the plan leaves them unknown
    pub promote_optional_computed: bool,
    /// Append valid values and defaults to schema descriptions
    pub enrich_descriptions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            custom_validators: true,
            promote_optional_computed: true,
            enrich_descriptions: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or names an unknown key.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_enable_everything() {
        let config = EngineConfig::default();
        assert!(config.custom_validators);
        assert!(config.promote_optional_computed);
        assert!(config.enrich_descriptions);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("custom_validators = false\n").unwrap();
        assert!(!config.custom_validators);
        assert!(config.promote_optional_computed);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EngineConfig::from_toml("retries = 3\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
