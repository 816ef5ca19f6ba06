//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Demo world layout.
    pub world: WorldConfig,
    /// Ray casting and sweep settings.
    pub physics: PhysicsConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Layout of the generated demo world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Where the body starts, in world units.
    pub spawn: [f32; 3],
    /// Y of the floor's top surface. Floor voxels occupy `floor_height - 1`.
    pub floor_height: i32,
    /// Half extent of the square floor around the origin, in voxels.
    pub floor_radius: i32,
}

/// Ray casting and collision sweep settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gap kept between a swept body and the face that stopped it.
    pub voxel_margin: f32,
    /// Maximum number of ray steps for reach queries.
    pub reach_steps: u32,
    /// Body box minimum corner relative to its position.
    pub body_min: [f32; 3],
    /// Body box maximum corner relative to its position.
    pub body_max: [f32; 3],
    /// Downward velocity gained per tick, in voxels per tick.
    pub gravity: f32,
    /// Number of simulation ticks the demo runs.
    pub fall_ticks: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn: [0.5, 6.0, 0.5],
            floor_height: 0,
            floor_radius: 24,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            voxel_margin: 0.02,
            reach_steps: 8,
            body_min: [-0.3, 0.0, -0.3],
            body_max: [0.3, 1.8, 0.3],
            gravity: 0.08,
            fall_ticks: 60,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

impl PhysicsConfig {
    /// Rejects values that would make sweeps or ray casts misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..0.5).contains(&self.voxel_margin) {
            return Err(ConfigError::InvalidValue {
                field: "physics.voxel_margin",
                reason: format!("{} is outside [0, 0.5)", self.voxel_margin),
            });
        }
        if self.reach_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "physics.reach_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        if (0..3).any(|i| self.body_min[i] > self.body_max[i]) {
            return Err(ConfigError::InvalidValue {
                field: "physics.body_min",
                reason: format!("{:?} exceeds body_max {:?}", self.body_min, self.body_max),
            });
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "physics.gravity",
                reason: format!("{} must be finite and non-negative", self.gravity),
            });
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.floor_radius < 0 {
            return Err(ConfigError::InvalidValue {
                field: "world.floor_radius",
                reason: format!("{} is negative", self.world.floor_radius),
            });
        }
        self.physics.validate()
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(config_dir)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// An edited file that fails validation is reported as an error and the
    /// caller keeps its current config.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(config_dir)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }
}
