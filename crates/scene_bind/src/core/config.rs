//! # Engine Configuration
//!
//! Settings that shape how the synchronization engine resolves values and
//! creates scene objects. Loadable from TOML or RON through [`Config`].

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

pub use crate::config::{Config, ConfigError};

/// Core synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter used by [`crate::foundation::logging::init_with_level`]
    pub log_level: String,
    /// Base URL prepended to relative asset references (texture maps, audio)
    pub asset_base_url: String,
    /// Whether newly created scene objects recompute their matrix every frame
    pub default_matrix_auto_update: bool,
    /// Seed for `"random"` angles and colors; `None` seeds from entropy
    pub rng_seed: Option<u64>,
    /// How many resource-to-resource references are followed while resolving
    pub max_reference_depth: u8,
    /// Asset kind (e.g. `"texture"`, `"audio"`) to path prefix under the base URL
    pub asset_paths: BTreeMap<String, String>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            asset_base_url: String::new(),
            default_matrix_auto_update: true,
            rng_seed: None,
            max_reference_depth: 8,
            asset_paths: BTreeMap::new(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the asset base URL
    pub fn with_asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = url.into();
        self
    }

    /// Set whether new objects keep automatic matrix updates on
    pub fn with_matrix_auto_update(mut self, enabled: bool) -> Self {
        self.default_matrix_auto_update = enabled;
        self
    }

    /// Seed the random source for reproducible resolution
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Register a path prefix for an asset kind
    pub fn with_asset_path(mut self, kind: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.asset_paths.insert(kind.into(), prefix.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reference_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_reference_depth must be at least 1".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::new()
            .with_asset_base_url("https://cdn.example.com/")
            .with_rng_seed(7)
            .with_asset_path("texture", "textures/");

        let text = config.to_string_with_format(Format::Toml).unwrap();
        let parsed = EngineConfig::from_str_with_format(&text, Format::Toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed = EngineConfig::from_str_with_format("rng_seed = 3\n", Format::Toml).unwrap();
        assert_eq!(parsed.rng_seed, Some(3));
        assert!(parsed.default_matrix_auto_update);
        assert_eq!(parsed.max_reference_depth, 8);
    }

    #[test]
    fn test_ron_parse() {
        let parsed = EngineConfig::from_str_with_format(
            "(log_level: \"debug\", default_matrix_auto_update: false)",
            Format::Ron,
        )
        .unwrap();
        assert_eq!(parsed.log_level, "debug");
        assert!(!parsed.default_matrix_auto_update);
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = EngineConfig::default();
        config.max_reference_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EngineConfig::load_from_file("settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
