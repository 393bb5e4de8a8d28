//! Runner configuration
//!
//! Which files to load, where the player starts, and how long to run.
//! Loaded through the engine's [`Config`] trait, so TOML and RON both work.

use scroll_engine::config::{Config, ConfigError, EntityCatalog, SimulationConfig};
use scroll_engine::foundation::math::Vec2;
use scroll_engine::world::RoomId;
use serde::{Deserialize, Serialize};

/// Headless runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Fallback log level when `RUST_LOG` is unset
    pub log_level: String,
    /// Simulation tuning file; built-in defaults when absent
    pub simulation: Option<String>,
    /// Entity catalog file; built-in catalog when absent
    pub catalog: Option<String>,
    /// Map directory holding `map.ron` and one file per room
    pub map_dir: String,
    /// Room the player spawns in
    pub start_room: String,
    /// Spawn position (feet)
    pub spawn: [f32; 2],
    /// Input script; the player idles when absent
    pub script: Option<String>,
    /// Ticks to run; 0 means the script's length
    pub ticks: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: None,
            catalog: None,
            map_dir: "assets/map".to_string(),
            start_room: "Start".to_string(),
            spawn: [64.0, 0.0],
            script: None,
            ticks: 0,
        }
    }
}

impl Config for RunnerConfig {}

impl RunnerConfig {
    /// Spawn point as a vector
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn[0], self.spawn[1])
    }

    /// Start room identifier
    pub fn start_room(&self) -> RoomId {
        RoomId::from(self.start_room.as_str())
    }

    /// Load and validate the simulation tuning
    pub fn load_simulation(&self) -> Result<SimulationConfig, ConfigError> {
        let config = match &self.simulation {
            Some(path) => SimulationConfig::load_from_file(path)?,
            None => SimulationConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the entity catalog
    pub fn load_catalog(&self) -> Result<EntityCatalog, ConfigError> {
        let catalog = match &self.catalog {
            Some(path) => EntityCatalog::load_from_file(path)?,
            None => EntityCatalog::default(),
        };
        catalog.validate()?;
        Ok(catalog)
    }
}
