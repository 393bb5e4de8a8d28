//! Velocity integration: gravity, friction, motion and per-tick timers

use crate::config::PhysicsConfig;
use crate::entity::Actor;

/// Multiplier applied to `vx` by one friction step
///
/// `1 - friction * |vx| * scale / tick_rate`, clamped to `[0, 1]` so a single
/// step can stop an actor but never flip its direction.
pub fn friction_factor(friction: f32, vx: f32, scale: f32, tick_rate: f32) -> f32 {
    (1.0 - friction * vx.abs() * scale / tick_rate).clamp(0.0, 1.0)
}

/// Advance one actor's velocity and position by one tick
pub fn integrate(actor: &mut Actor, config: &PhysicsConfig) {
    let tick_rate = config.tick_rate;

    if actor.gravity_affected {
        actor.velocity.y += config.gravity / tick_rate;
    }

    let scale = if actor.on_ground() {
        config.ground_friction_scale
    } else {
        config.air_friction_scale
    };
    actor.velocity.x *= friction_factor(actor.friction, actor.velocity.x, scale, tick_rate);

    actor.position += actor.velocity / tick_rate;
}

/// Count down invulnerability and projectile lifetimes; expired projectiles are flagged
pub fn advance_timers(actor: &mut Actor, step_seconds: f32) {
    if let Some(living) = actor.living_mut() {
        living.tick_invulnerability(step_seconds);
    }

    let expired = match actor.projectile_data_mut() {
        Some(projectile) => {
            projectile.lifetime -= step_seconds;
            projectile.lifetime <= 0.0
        }
        None => false,
    };
    if expired {
        actor.mark_removed();
    }
}
