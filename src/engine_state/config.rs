//! # Engine Configuration
//!
//! Runtime settings, loaded from JSON. Every field has a default, so a config
//! file only needs the keys it changes:
//!
//! ```json
//! { "render_distance": 6, "seed": 42 }
//! ```
//!
//! Chunk dimensions are compile-time constants and are not configurable.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Settings for one engine instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunks drawn around the camera chunk, on each axis.
    pub render_distance: i32,
    /// How far the player can break and place blocks, in blocks.
    pub reach: f32,
    /// Maximum number of meshed chunks; 0 derives it from the render distance.
    pub rendered_chunk_capacity: usize,
    /// World seed for terrain generation.
    pub seed: u64,
    /// Chunks generated around the origin at startup, on each axis.
    pub terrain_radius: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            render_distance: 4,
            reach: 6.0,
            rendered_chunk_capacity: 0,
            seed: 0,
            terrain_radius: 4,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if self.terrain_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "terrain_radius must not be negative, got {}",
                self.terrain_radius
            )));
        }
        if !(self.reach > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "reach must be positive, got {}",
                self.reach
            )));
        }
        Ok(())
    }

    /// The mesh cache capacity, derived from the render distance when unset.
    pub fn chunk_capacity(&self) -> NonZeroUsize {
        let side = 2 * self.render_distance.max(0) as usize + 1;
        let derived = 2 * side * side;
        NonZeroUsize::new(self.rendered_chunk_capacity)
            .or(NonZeroUsize::new(derived))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.render_distance, 4);
        assert_eq!(config.chunk_capacity().get(), 162);
    }

    #[test]
    fn explicit_capacity_wins() {
        let config =
            EngineConfig::from_json_str(r#"{ "rendered_chunk_capacity": 10 }"#).unwrap();
        assert_eq!(config.chunk_capacity().get(), 10);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "reach": 0.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = EngineConfig::from_json_str(r#"{ "render_distance": -1 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = EngineConfig::from_json_str("{ render_distance: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let result = EngineConfig::from_file("/nonexistent/voxel-world.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
