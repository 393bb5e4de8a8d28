//! Physics engine
//!
//! One fixed step over the live actor collection:
//! 1. integration (gravity, multiplicative friction, motion) and timers
//! 2. pairwise collision in collection order with kind-pair dispatch
//! 3. ground and wall probes for living actors
//! 4. collision-shape replacement for actors whose state changed silhouette
//!
//! Flagged actors (expired projectiles, dead monsters) leave the collection
//! at the end of the step. Nothing here fails: every step produces a valid
//! next state.

pub mod collision_system;
pub mod integration;
pub mod probes;

pub use collision_system::{hit_actor, push_out, response_for, CollisionEvent, CollisionStats, Response};
pub use integration::{advance_timers, friction_factor, integrate};

use crate::config::SimulationConfig;
use crate::entity::{ActorCollection, ActorKey};

/// Result of one physics step
#[derive(Debug, Default)]
pub struct PhysicsReport {
    /// Collision events in resolution order
    pub events: Vec<CollisionEvent>,
    /// Actors removed at the end of the step
    pub removed: Vec<ActorKey>,
    /// Pair counters
    pub stats: CollisionStats,
}

/// Fixed-step physics over an actor collection
#[derive(Debug, Default)]
pub struct PhysicsEngine {
    order: Vec<ActorKey>,
}

impl PhysicsEngine {
    /// Create a physics engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every actor by one tick
    pub fn step(&mut self, config: &SimulationConfig, actors: &mut ActorCollection) -> PhysicsReport {
        let mut report = PhysicsReport::default();
        let step_seconds = config.step_seconds();

        self.order.clear();
        self.order.extend_from_slice(actors.keys());

        for actor in actors.actors_mut() {
            advance_timers(actor, step_seconds);
            integrate(actor, &config.physics);
        }

        report.stats = collision_system::resolve_pairs(actors, &self.order, &config.combat, &mut report.events);

        probes::update_all(actors, &self.order, config.physics.probe_thickness);

        report.removed = self
            .order
            .iter()
            .copied()
            .filter(|key| actors.get(*key).map_or(false, |actor| actor.is_marked_removed()))
            .collect();
        if !report.removed.is_empty() {
            let removed = actors.take_removed();
            log::trace!("Removed {} actors", removed.len());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityCatalog;
    use crate::entity::{Actor, ActorKind, ActorState};
    use crate::foundation::math::Vec2;
    use crate::world::RoomId;
    use approx::assert_abs_diff_eq;

    fn room() -> RoomId {
        RoomId::from("A")
    }

    #[test]
    fn test_falling_player_lands() {
        let config = SimulationConfig::default();
        let catalog = EntityCatalog::default();
        let mut actors = ActorCollection::new();
        actors.spawn(Actor::terrain(Vec2::new(-200.0, 0.0), 400.0, 32.0, room()));
        let player = actors.spawn(Actor::player(Vec2::new(0.0, -1.0), catalog.get("Player").unwrap(), 2.0, room()));
        actors.get_mut(player).unwrap().state = ActorState::Falling;
        actors.get_mut(player).unwrap().velocity.y = 120.0;

        let mut physics = PhysicsEngine::new();
        physics.step(&config, &mut actors);

        let landed = actors.get(player).unwrap();
        assert!(landed.on_ground());
        assert_eq!(landed.velocity.y, 0.0);
        assert_abs_diff_eq!(landed.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_player_rests_on_floor() {
        let config = SimulationConfig::default();
        let catalog = EntityCatalog::default();
        let mut actors = ActorCollection::new();
        actors.spawn(Actor::terrain(Vec2::new(-200.0, 0.0), 400.0, 32.0, room()));
        let player = actors.spawn(Actor::player(Vec2::zeros(), catalog.get("Player").unwrap(), 2.0, room()));

        let mut physics = PhysicsEngine::new();
        for _ in 0..120 {
            physics.step(&config, &mut actors);
            let actor = actors.get(player).unwrap();
            assert!(actor.on_ground());
            assert_abs_diff_eq!(actor.position.y, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_projectile_hits_wall_and_leaves() {
        let config = SimulationConfig::default();
        let catalog = EntityCatalog::default();
        let mut actors = ActorCollection::new();
        let wall = actors.spawn(Actor::terrain(Vec2::new(20.0, -100.0), 20.0, 200.0, room()));
        let beam = actors.spawn(Actor::projectile(
            crate::entity::ProjectileKind::Beam,
            Vec2::zeros(),
            (1.0, 0.0),
            catalog.get("Beam").unwrap(),
            false,
            room(),
        ));

        let mut physics = PhysicsEngine::new();
        let mut removed = Vec::new();
        for _ in 0..10 {
            removed.extend(physics.step(&config, &mut actors).removed);
        }

        assert_eq!(removed, vec![beam]);
        assert!(actors.get(beam).is_none());
        assert_eq!(actors.get(wall).map(|a| a.kind()), Some(ActorKind::Terrain));
    }

    #[test]
    fn test_monster_contact_hurts_player() {
        let config = SimulationConfig::default();
        let catalog = EntityCatalog::default();
        let mut actors = ActorCollection::new();
        actors.spawn(Actor::terrain(Vec2::new(-200.0, 0.0), 400.0, 32.0, room()));
        let player = actors.spawn(Actor::player(Vec2::zeros(), catalog.get("Player").unwrap(), 2.0, room()));
        actors.spawn(Actor::monster("Crawler", Vec2::new(20.0, 0.0), catalog.get("Crawler").unwrap(), 2.0, room()));

        let mut physics = PhysicsEngine::new();
        let report = physics.step(&config, &mut actors);

        let hurt = actors.get(player).unwrap();
        assert_eq!(hurt.health(), Some(91));
        assert!(hurt.velocity.x < 0.0);
        assert!(report.events.iter().any(|e| matches!(e, CollisionEvent::Hit { target, .. } if *target == player)));
    }
}
