//! Explicit context handed to the synchronization engine
//!
//! Holds what would otherwise be process-wide state: configuration, the
//! asset location registry and the random source used by `"random"` inputs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ConfigError, EngineConfig};

/// Context shared by everything the engine resolves
#[derive(Debug)]
pub struct SyncContext {
    config: EngineConfig,
    asset_paths: BTreeMap<String, String>,
    rng: RefCell<StdRng>,
}

impl SyncContext {
    /// Create a context from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            asset_paths: config.asset_paths.clone(),
            config,
            rng: RefCell::new(rng),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register or replace the path prefix for an asset kind
    pub fn register_asset_path(&mut self, kind: impl Into<String>, prefix: impl Into<String>) {
        self.asset_paths.insert(kind.into(), prefix.into());
    }

    /// Drop every registered asset path, returning to the configured set
    pub fn reset_asset_paths(&mut self) {
        self.asset_paths = self.config.asset_paths.clone();
    }

    /// Resolve an asset reference to a full URL
    ///
    /// Absolute references (`scheme://…`, `/…`, `data:`) are returned as-is.
    pub fn asset_url(&self, kind: &str, reference: &str) -> String {
        if reference.contains("://") || reference.starts_with('/') || reference.starts_with("data:") {
            return reference.to_string();
        }
        let prefix = self.asset_paths.get(kind).map_or("", String::as_str);
        format!("{}{}{}", self.config.asset_base_url, prefix, reference)
    }

    /// Uniform random number in `[0, 1)`
    pub fn random_unit(&self) -> f32 {
        self.rng.borrow_mut().gen::<f32>()
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            asset_paths: config.asset_paths.clone(),
            config,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }
}
