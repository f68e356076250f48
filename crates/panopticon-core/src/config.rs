//! Configuration loading and typed config structures for the Panopticon
//! simulation.
//!
//! The canonical configuration lives in `panopticon-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads and validates the
//! file. Every field has a default, so a missing or partial file still
//! yields a runnable configuration.

use std::path::Path;

use panopticon_agents::{CombatConfig, VitalsConfig};
use panopticon_world::StartingWorldParams;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A field combination fails validation.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong with the values.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `panopticon-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Facility map and population settings.
    #[serde(default)]
    pub map: MapConfig,

    /// Hourly status phase parameters.
    #[serde(default)]
    pub status: VitalsConfig,

    /// Combat and theft parameters.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub bounds: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values fail validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values fail validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width < 4 || self.map.height < 4 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "map must be at least 4x4, got {}x{}",
                    self.map.width, self.map.height
                ),
            });
        }
        let population = self.map.guard_count + self.map.prisoner_count;
        if population == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("population must be at least 1"),
            });
        }
        // Interior cells available for spawning; the border is wall.
        let interior = (self.map.width - 2) * (self.map.height - 2);
        if i64::from(population) > i64::from(interior) {
            return Err(ConfigError::Invalid {
                reason: format!("population {population} exceeds interior capacity {interior}"),
            });
        }
        if self.bounds.stall_hours == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("bounds.stall_hours must be positive"),
            });
        }
        Ok(())
    }

    /// The starting-world parameters derived from the map section.
    pub const fn starting_world_params(&self) -> StartingWorldParams {
        StartingWorldParams {
            width: self.map.width,
            height: self.map.height,
            guard_count: self.map.guard_count,
            prisoner_count: self.map.prisoner_count,
            default_relationship: self.map.default_relationship,
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds an external decision source has per agent before the
    /// engine falls back to goals.
    #[serde(default = "default_decision_timeout_ms")]
    pub decision_timeout_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            decision_timeout_ms: default_decision_timeout_ms(),
        }
    }
}

/// Facility map and population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapConfig {
    /// Grid width in cells.
    #[serde(default = "default_map_width")]
    pub width: i32,

    /// Grid height in cells.
    #[serde(default = "default_map_height")]
    pub height: i32,

    /// Number of guards to spawn.
    #[serde(default = "default_guard_count")]
    pub guard_count: u32,

    /// Number of prisoners to spawn.
    #[serde(default = "default_prisoner_count")]
    pub prisoner_count: u32,

    /// Starting relationship score between every pair of agents.
    #[serde(default = "default_relationship")]
    pub default_relationship: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: default_map_width(),
            height: default_map_height(),
            guard_count: default_guard_count(),
            prisoner_count: default_prisoner_count(),
            default_relationship: default_relationship(),
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop once the in-sim day exceeds this value (0 = unlimited).
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Stop when no agent has acted for this many in-sim hours.
    #[serde(default = "default_stall_hours")]
    pub stall_hours: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            stall_hours: default_stall_hours(),
        }
    }
}

fn default_world_name() -> String {
    String::from("Panopticon")
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_decision_timeout_ms() -> u64 {
    5000
}

const fn default_map_width() -> i32 {
    9
}

const fn default_map_height() -> i32 {
    16
}

const fn default_guard_count() -> u32 {
    2
}

const fn default_prisoner_count() -> u32 {
    4
}

const fn default_relationship() -> u32 {
    50
}

const fn default_max_days() -> u32 {
    7
}

const fn default_stall_hours() -> u64 {
    48
}
