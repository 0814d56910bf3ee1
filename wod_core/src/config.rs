//! Configuration file support for the wod tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wod/config.toml`.

use crate::catalog::{get_default_catalog, MovementCatalog};
use crate::{Error, ParseOptions, RenderOptions, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    #[serde(default)]
    pub parser: ParseOptions,

    #[serde(default)]
    pub render: RenderOptions,
}

/// Movement dictionary location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Catalog export to load; the built-in catalog is used when the file
    /// does not exist
    #[serde(default = "default_dictionary_path")]
    pub path: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: default_dictionary_path(),
        }
    }
}

// Default value functions
fn default_dictionary_path() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("wod").join("movements.json")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
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

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("wod").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Load the configured dictionary, or the built-in catalog if absent
    pub fn load_dictionary(&self) -> Result<MovementCatalog> {
        if self.dictionary.path.exists() {
            MovementCatalog::load_from(&self.dictionary.path)
        } else {
            tracing::debug!(
                "No dictionary at {:?}, using built-in catalog",
                self.dictionary.path
            );
            Ok(get_default_catalog().clone())
        }
    }
}
