//! Health, damage immunity and ground contact for living actors

use crate::foundation::math::Vec2;
use crate::geometry::CollisionBox;

/// Damage request passed to the hit contract
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Health to remove; zero means knockback only
    pub amount: u32,
    /// Knockback speeds: `x` away from the source, `y` upward
    pub knockback: Vec2,
    /// Ignore the invulnerability timer
    pub forced: bool,
}

impl Hit {
    /// A damaging hit with no knockback
    pub fn damage(amount: u32) -> Self {
        Self {
            amount,
            knockback: Vec2::zeros(),
            forced: false,
        }
    }

    /// Set knockback speeds
    pub fn with_knockback(mut self, x: f32, y: f32) -> Self {
        self.knockback = Vec2::new(x, y);
        self
    }

    /// Bypass the invulnerability timer
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

/// What the hit contract did to a living actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Health was removed (the timer was started)
    Damaged,
    /// Knockback only: zero damage, timer untouched
    KnockbackOnly,
    /// Still invulnerable; nothing changed
    Ignored,
    /// Already dead; nothing changed
    AlreadyDead,
}

impl HitOutcome {
    /// Whether knockback should be applied
    pub fn applies_knockback(self) -> bool {
        matches!(self, Self::Damaged | Self::KnockbackOnly)
    }
}

/// Living-actor data
#[derive(Debug, Clone, PartialEq)]
pub struct Living {
    health: u32,
    max_health: u32,
    /// Contact damage this actor deals
    pub damage: u32,
    invulnerability: f32,
    ground_probe: CollisionBox,
    /// Whether the ground probe touched terrain last physics pass
    pub on_ground: bool,
}

impl Living {
    /// Full-health living data with a ground probe under `body`
    pub fn new(max_health: u32, damage: u32, body: &CollisionBox, probe_thickness: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            damage,
            invulnerability: 0.0,
            ground_probe: body.ground_probe(probe_thickness),
            on_ground: false,
        }
    }

    /// Current health
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Set health outside the hit path (pickups, save restore)
    pub fn set_health(&mut self, health: u32) {
        debug_assert!(
            health <= self.max_health,
            "health {} above maximum {}",
            health,
            self.max_health
        );
        self.health = health.min(self.max_health);
    }

    /// Change the maximum, clamping current health under it
    pub fn set_max_health(&mut self, max_health: u32) {
        self.max_health = max_health;
        self.health = self.health.min(max_health);
    }

    /// Whether health reached zero
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Seconds of damage immunity left
    pub fn invulnerability(&self) -> f32 {
        self.invulnerability
    }

    /// Whether damaging hits are currently ignored
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    /// Count the immunity timer down by one tick
    pub fn tick_invulnerability(&mut self, step_seconds: f32) {
        self.invulnerability = (self.invulnerability - step_seconds).max(0.0);
    }

    /// Floor probe box
    pub fn ground_probe(&self) -> &CollisionBox {
        &self.ground_probe
    }

    /// Replace the floor probe (after a body shape change)
    pub fn replace_ground_probe(&mut self, probe: CollisionBox) {
        self.ground_probe = probe;
    }

    /// Apply the health side of a hit
    ///
    /// Zero-damage hits never touch the timer, so knockback-only effects work
    /// on an invulnerable actor. Damaging hits are ignored while invulnerable
    /// unless forced; otherwise they remove health (clamping at zero) and
    /// restart the timer.
    pub fn take_hit(&mut self, hit: &Hit, invulnerability_seconds: f32) -> HitOutcome {
        if self.is_dead() {
            return HitOutcome::AlreadyDead;
        }
        if hit.amount == 0 {
            return HitOutcome::KnockbackOnly;
        }
        if self.is_invulnerable() && !hit.forced {
            return HitOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(hit.amount);
        self.invulnerability = invulnerability_seconds;
        HitOutcome::Damaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn living(max_health: u32) -> Living {
        Living::new(max_health, 1, &CollisionBox::new(0.0, -32.0, 16.0, 32.0), 2.0)
    }

    #[test]
    fn test_ground_probe_sits_under_body() {
        let body = CollisionBox::new(-8.0, -32.0, 16.0, 32.0);
        let living = Living::new(10, 0, &body, 2.0);
        assert_eq!(living.ground_probe().y(), body.y() + body.height());
        assert_eq!(living.ground_probe().height(), 2.0);
    }

    #[test]
    fn test_damage_starts_invulnerability() {
        let mut living = living(10);
        assert_eq!(living.take_hit(&Hit::damage(3), 1.0), HitOutcome::Damaged);
        assert_eq!(living.health(), 7);
        assert!(living.is_invulnerable());

        assert_eq!(living.take_hit(&Hit::damage(3), 1.0), HitOutcome::Ignored);
        assert_eq!(living.health(), 7);
    }

    #[test]
    fn test_forced_hit_ignores_timer() {
        let mut living = living(10);
        living.take_hit(&Hit::damage(3), 1.0);
        assert_eq!(living.take_hit(&Hit::damage(3).forced(), 1.0), HitOutcome::Damaged);
        assert_eq!(living.health(), 4);
    }

    #[test]
    fn test_zero_damage_is_knockback_only() {
        let mut living = living(10);
        living.take_hit(&Hit::damage(1), 1.0);
        let before = living.invulnerability();
        assert_eq!(living.take_hit(&Hit::damage(0), 1.0), HitOutcome::KnockbackOnly);
        assert_eq!(living.invulnerability(), before);
        assert_eq!(living.health(), 9);
    }

    #[test]
    fn test_health_clamps_at_zero() {
        let mut living = living(5);
        living.take_hit(&Hit::damage(50), 1.0);
        assert_eq!(living.health(), 0);
        assert!(living.is_dead());
        assert_eq!(living.take_hit(&Hit::damage(1).forced(), 1.0), HitOutcome::AlreadyDead);
    }

    #[test]
    fn test_timer_counts_down() {
        let mut living = living(5);
        living.take_hit(&Hit::damage(1), 0.04);
        for _ in 0..3 {
            living.tick_invulnerability(1.0 / 60.0);
        }
        assert!(!living.is_invulnerable());
        assert_eq!(living.invulnerability(), 0.0);
    }

    #[test]
    fn test_max_health_lowering_clamps_health() {
        let mut living = living(10);
        living.set_max_health(4);
        assert_eq!(living.health(), 4);
    }
}
