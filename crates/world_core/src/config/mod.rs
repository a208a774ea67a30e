//! Configuration system
//!
//! Runtime settings are plain serde structs loaded from TOML or RON files
//! through the [`Config`] trait.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration, falling back to defaults when the file is absent
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings for a [`World`](crate::ecs::World)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fallback log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Maximum number of live entities
    pub max_entities: usize,
    /// Start the simulation as soon as the world is built
    pub start_simulating: bool,
    /// Step length in seconds used by fixed-step drivers
    pub fixed_delta: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_entities: 10_000,
            start_simulating: false,
            fixed_delta: 1.0 / 60.0,
        }
    }
}

impl Config for WorldConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_config_toml_partial() {
        let config: WorldConfig = toml::from_str("max_entities = 12\n").unwrap();
        assert_eq!(config.max_entities, 12);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_world_config_ron() {
        let config: WorldConfig = ron::from_str("(log_level: \"debug\", start_simulating: true)").unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.start_simulating);
        assert_eq!(config.max_entities, WorldConfig::default().max_entities);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("world_config_{}.toml", std::process::id()));
        let config = WorldConfig { max_entities: 64, ..WorldConfig::default() };
        config.save_to_file(&path).unwrap();
        let loaded = WorldConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_unsupported_format() {
        let result = WorldConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));
    }
}
