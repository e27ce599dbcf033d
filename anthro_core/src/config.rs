//! Configuration file support for anthro.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/anthro/config.toml`.
//! Every section falls back to the published coefficients, so a partial file
//! only overrides what it names.

use crate::tables::{
    AutoregulationTables, BodyCompositionTables, EnergyTables, ReadinessTables,
};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical tables, built once
static CANONICAL: Lazy<Config> = Lazy::new(Config::default);

/// The canonical configuration used by `Default` estimators
pub fn canonical() -> &'static Config {
    &CANONICAL
}

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub body_composition: BodyCompositionTables,

    #[serde(default)]
    pub energy: EnergyTables,

    #[serde(default)]
    pub readiness: ReadinessTables,

    #[serde(default)]
    pub autoregulation: AutoregulationTables,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        let problems = config.validate();
        if !problems.is_empty() {
            return Err(Error::Config(format!(
                "{} is inconsistent: {}",
                path.display(),
                problems.join("; ")
            )));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME").map_err(|_| {
                    Error::Config("neither a config directory nor HOME is available".into())
                })?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("anthro").join("config.toml"))
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Collect inconsistencies across every section
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.body_composition.validate());
        errors.extend(self.energy.validate());
        errors.extend(self.readiness.validate());
        errors.extend(self.autoregulation.validate());
        errors
    }
}
