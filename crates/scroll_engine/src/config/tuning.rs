//! # Simulation Tuning
//!
//! Numeric tuning for the physics engine, the movement state machine and the
//! hit contract. A `SimulationConfig` is an immutable snapshot: the simulation
//! holds it behind an `Arc` and swaps it wholesale between ticks.

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Integration and contact-probe constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s²
    pub gravity: f32,
    /// Fixed ticks per simulated second
    pub tick_rate: f32,
    /// Friction scale for living actors standing on the ground
    pub ground_friction_scale: f32,
    /// Friction scale for everything else (airborne actors, projectiles, ...)
    pub air_friction_scale: f32,
    /// Thickness of ground and wall probe boxes
    pub probe_thickness: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            tick_rate: 60.0,
            ground_friction_scale: 10.0,
            air_friction_scale: 1.0,
            probe_thickness: 2.0,
        }
    }
}

/// Movement state machine constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed cap on the ground (units/s)
    pub ground_speed_cap: f32,
    /// Horizontal speed cap in the air (units/s)
    pub air_speed_cap: f32,
    /// Horizontal speed gained per tick on the ground
    pub ground_acceleration: f32,
    /// Horizontal speed gained per tick in the air
    pub air_acceleration: f32,
    /// Upward speed set by a jump (applied as `vy = -jump_impulse`)
    pub jump_impulse: f32,
    /// Upward speed added per tick while a jump is sustained
    pub jump_sustain_impulse: f32,
    /// Number of ticks a held jump keeps adding thrust
    pub jump_sustain_ticks: u32,
    /// Horizontal speed away from the wall given by a wall jump
    pub wall_jump_impulse: f32,
    /// Friction coefficient used to stop quickly on the ground
    pub high_friction: f32,
    /// Friction coefficient used in the air
    pub low_friction: f32,
    /// Friction coefficient used while walking under input
    pub walk_friction: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            ground_speed_cap: 400.0,
            air_speed_cap: 200.0,
            ground_acceleration: 40.0,
            air_acceleration: 20.0,
            jump_impulse: 450.0,
            jump_sustain_impulse: 25.0,
            jump_sustain_ticks: 15,
            wall_jump_impulse: 300.0,
            high_friction: 0.005,
            low_friction: 0.0001,
            walk_friction: 0.0,
        }
    }
}

/// Hit contract constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Seconds of damage immunity after a damaging hit
    pub invulnerability_seconds: f32,
    /// Knockback applied by contact damage: horizontal speed away from the source
    pub knockback_x: f32,
    /// Knockback applied by contact damage: upward speed
    pub knockback_y: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            invulnerability_seconds: 1.0,
            knockback_x: 200.0,
            knockback_y: 150.0,
        }
    }
}

/// Room streaming switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Stream neighbouring rooms in the background; when off, only `flush` loads rooms
    pub enabled: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// # Complete Simulation Configuration
///
/// Top-level snapshot threaded into the physics engine and the movement
/// state machine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration constants
    pub physics: PhysicsConfig,
    /// Movement constants
    pub movement: MovementConfig,
    /// Damage constants
    pub combat: CombatConfig,
    /// Streaming switches
    pub streaming: StreamingConfig,
}

impl SimulationConfig {
    /// Validate the entire configuration
    ///
    /// The per-tick code assumes these hold; call this once after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.tick_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.tick_rate must be positive, got {}",
                physics.tick_rate
            )));
        }
        if physics.ground_friction_scale < 0.0 || physics.air_friction_scale < 0.0 {
            return Err(ConfigError::Invalid("friction scales cannot be negative".to_string()));
        }
        if physics.probe_thickness <= 0.0 {
            return Err(ConfigError::Invalid("physics.probe_thickness must be positive".to_string()));
        }

        let movement = &self.movement;
        let non_negative = [
            ("movement.ground_speed_cap", movement.ground_speed_cap),
            ("movement.air_speed_cap", movement.air_speed_cap),
            ("movement.ground_acceleration", movement.ground_acceleration),
            ("movement.air_acceleration", movement.air_acceleration),
            ("movement.jump_impulse", movement.jump_impulse),
            ("movement.jump_sustain_impulse", movement.jump_sustain_impulse),
            ("movement.wall_jump_impulse", movement.wall_jump_impulse),
            ("movement.high_friction", movement.high_friction),
            ("movement.low_friction", movement.low_friction),
            ("movement.walk_friction", movement.walk_friction),
            ("combat.invulnerability_seconds", self.combat.invulnerability_seconds),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{} cannot be negative, got {}", name, value)));
            }
        }

        Ok(())
    }

    /// Seconds per tick
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.physics.tick_rate
    }
}

impl Config for SimulationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = SimulationConfig::default();
        config.physics.tick_rate = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_nan_cap_rejected() {
        let mut config = SimulationConfig::default();
        config.movement.ground_speed_cap = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            "[physics]\ngravity = 900.0\n\n[movement]\njump_sustain_ticks = 10\n",
        )
        .unwrap();

        assert_eq!(config.physics.gravity, 900.0);
        assert_eq!(config.physics.tick_rate, 60.0);
        assert_eq!(config.movement.jump_sustain_ticks, 10);
        assert_eq!(config.movement.ground_speed_cap, 400.0);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.toml");
        let path = path.to_str().unwrap();

        let mut config = SimulationConfig::default();
        config.combat.invulnerability_seconds = 0.5;
        config.save_to_file(path).unwrap();

        let loaded = SimulationConfig::load_from_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = SimulationConfig::load_from_file("simulation.json");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));
    }
}
