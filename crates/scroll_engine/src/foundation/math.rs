//! Math utilities and types
//!
//! The simulation is planar: positions and velocities are 2D vectors in world
//! units, with +y pointing down (screen convention).

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Common scalar helpers used by the per-tick systems
pub mod utils {
    /// Move `value` toward `target` by at most `step`, never passing it
    pub fn approach(value: f32, target: f32, step: f32) -> f32 {
        if value < target {
            (value + step).min(target)
        } else if value > target {
            (value - step).max(target)
        } else {
            value
        }
    }

    /// Sign of `value` as -1.0, 0.0 or 1.0 (unlike `f32::signum`, zero maps to zero)
    pub fn sign(value: f32) -> f32 {
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}
