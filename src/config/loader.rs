//! Configuration loader

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{CcError, ConfigError};
use crate::rules::Regime;

use super::{AugmentConfig, PathsConfig};

pub const CONFIG_FILENAME: &str = ".ccscan.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub augment: AugmentConfig,

    /// Rule file overrides keyed by regime name
    #[serde(default)]
    pub rulesets: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load configuration from file or return default
    pub fn load_or_default() -> Result<Self, CcError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, CcError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CcError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        toml::from_str(&content).map_err(Into::into)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, CcError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// Rule files for a regime: the override when present, else the bundled
    /// defaults. Override keys match regime names case-insensitively.
    pub fn rule_files(&self, regime: Regime) -> Vec<String> {
        self.rulesets
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(regime.as_str()))
            .map(|(_, files)| files.clone())
            .unwrap_or_else(|| {
                regime
                    .default_rule_files()
                    .iter()
                    .map(|f| f.to_string())
                    .collect()
            })
    }
}
