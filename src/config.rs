//! Application configuration.
//!
//! Loaded from a TOML file in the platform config directory; a missing file
//! yields defaults so the binary runs with zero setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::world::assembler::WorldPolicy;
use crate::world::import::ImportOptions;

/// Application configuration.
///
/// Every section falls back to its default, so a partial file only has to
/// name the keys it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Upstream API settings
    pub apis: ApiSettings,
    /// World generation settings
    pub world: WorldSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            apis: ApiSettings::default(),
            world: WorldSettings::default(),
        }
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL for the postcode geocoder
    pub postcodes_base_url: String,
    /// Overpass interpreter URL for map data
    pub overpass_base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            postcodes_base_url: "https://api.postcodes.io".to_string(),
            overpass_base_url: "https://overpass-api.de/api/interpreter".to_string(),
        }
    }
}

/// World generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Search radius for real buildings, in meters
    pub search_radius_m: u32,
    /// Maximum number of imported buildings per world
    pub max_buildings: usize,
    /// Maximum number of creatures spawned into a world
    pub max_creatures: usize,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            search_radius_m: 300,
            max_buildings: 50,
            max_creatures: 25,
        }
    }
}

impl WorldSettings {
    /// Translate settings into an assembler policy.
    pub fn to_policy(&self) -> WorldPolicy {
        WorldPolicy {
            search_radius_m: self.search_radius_m,
            max_creatures: self.max_creatures,
            import: ImportOptions {
                max_buildings: self.max_buildings,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Get the application config directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "schoolquest", "SchoolQuest")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load application configuration, falling back to defaults when absent.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to an explicit path.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
