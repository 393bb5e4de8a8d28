//! Pairwise collision detection and kind-pair dispatch
//!
//! Every unordered pair of live actors is tested once, in collection order,
//! against the positions left by earlier resolutions in the same pass. What
//! happens on overlap is looked up from the pair's kind tags; pairs with no
//! entry are ignored. Resolution is greedy: the pass never tries to minimise
//! total penetration across several simultaneous contacts.

use crate::config::CombatConfig;
use crate::entity::{Actor, ActorCollection, ActorKey, ActorKind, Hit};
use crate::foundation::math::Vec2;
use crate::geometry::{overlaps, penetration_vector};

/// Response to an overlapping pair, with the roles already assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Push the mover out of the solid along the shallower axis
    PushOut,
    /// Remove the projectile
    Absorb,
    /// The monster's contact damage hits the player
    ContactDamage,
    /// The projectile hits a living target and is removed
    ProjectileHit,
    /// The player stands in a door area
    DoorContact,
}

/// Table entry for an ordered kind pair
///
/// Returns the response and whether the roles are swapped, i.e. whether the
/// second actor of the pair plays the first role (mover, projectile, player).
pub fn response_for(a: ActorKind, b: ActorKind) -> Option<(Response, bool)> {
    use ActorKind::*;

    let direct = |a: ActorKind, b: ActorKind| match (a, b) {
        (PlayerCharacter | Monster | NonPlayerCharacter, Terrain | DynamicObstacle) => Some(Response::PushOut),
        (DynamicObstacle, Terrain) => Some(Response::PushOut),
        (Projectile, Terrain | DynamicObstacle) => Some(Response::Absorb),
        (PlayerCharacter, Monster) => Some(Response::ContactDamage),
        (Projectile, Monster | PlayerCharacter) => Some(Response::ProjectileHit),
        (PlayerCharacter, Area) => Some(Response::DoorContact),
        _ => None,
    };

    direct(a, b).map(|r| (r, false)).or_else(|| direct(b, a).map(|r| (r, true)))
}

/// Something the collision pass did that the rest of the tick may care about
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    /// A living actor was hit
    Hit {
        /// Who was hit
        target: ActorKey,
        /// Monster or projectile responsible
        source: ActorKey,
        /// Whether the target died from it
        died: bool,
    },
    /// A projectile was absorbed by solid geometry
    Absorbed {
        /// The projectile
        projectile: ActorKey,
    },
    /// The player overlaps a door area
    DoorContact {
        /// The door
        door: ActorKey,
    },
}

/// Counters for the last pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Pairs tested for overlap
    pub pairs_tested: usize,
    /// Overlapping pairs with a response
    pub resolved: usize,
}

/// Apply a hit and flag dead monsters for removal; returns whether the target is dead
///
/// `source` is the world point the knockback pushes away from.
pub fn hit_actor(
    actors: &mut ActorCollection,
    target: ActorKey,
    hit: &Hit,
    source: Option<Vec2>,
    combat: &CombatConfig,
) -> bool {
    let Some(actor) = actors.get_mut(target) else {
        return false;
    };
    let died = actor.apply_hit(hit, source, combat.invulnerability_seconds);
    if died && actor.kind() == ActorKind::Monster {
        actor.mark_removed();
    }
    died
}

/// Test every pair in `keys` order and apply the responses
pub fn resolve_pairs(
    actors: &mut ActorCollection,
    keys: &[ActorKey],
    combat: &CombatConfig,
    events: &mut Vec<CollisionEvent>,
) -> CollisionStats {
    let mut stats = CollisionStats::default();

    for (i, &first) in keys.iter().enumerate() {
        for &second in &keys[i + 1..] {
            let (Some(a), Some(b)) = (actors.get(first), actors.get(second)) else {
                continue;
            };
            if a.is_marked_removed() || b.is_marked_removed() {
                continue;
            }

            stats.pairs_tested += 1;
            let Some((response, swapped)) = response_for(a.kind(), b.kind()) else {
                continue;
            };
            if !overlaps(a.hitbox(), a.position, b.hitbox(), b.position) {
                continue;
            }

            let (primary, other) = if swapped { (second, first) } else { (first, second) };
            if resolve(actors, response, primary, other, combat, events) {
                stats.resolved += 1;
            }
        }
    }

    stats
}

fn resolve(
    actors: &mut ActorCollection,
    response: Response,
    primary: ActorKey,
    other: ActorKey,
    combat: &CombatConfig,
    events: &mut Vec<CollisionEvent>,
) -> bool {
    match response {
        Response::PushOut => {
            let Some((mover, solid)) = actors.get_pair_mut(primary, other) else {
                return false;
            };
            push_out(mover, solid);
            true
        }
        Response::Absorb => {
            let Some(projectile) = actors.get_mut(primary) else {
                return false;
            };
            projectile.mark_removed();
            events.push(CollisionEvent::Absorbed { projectile: primary });
            true
        }
        Response::ContactDamage => {
            let Some(monster) = actors.get(other) else {
                return false;
            };
            let damage = monster.living().map_or(0, |living| living.damage);
            let source = monster.world_box().center();
            let hit = Hit::damage(damage).with_knockback(combat.knockback_x, combat.knockback_y);
            let died = hit_actor(actors, primary, &hit, Some(source), combat);
            events.push(CollisionEvent::Hit {
                target: primary,
                source: other,
                died,
            });
            true
        }
        Response::ProjectileHit => {
            let (Some(projectile), Some(target)) = (actors.get(primary), actors.get(other)) else {
                return false;
            };
            let Some(data) = projectile.projectile_data() else {
                return false;
            };
            // Player shots hurt monsters, monster shots hurt the player
            let hurts_target = match target.kind() {
                ActorKind::Monster => !data.hostile,
                ActorKind::PlayerCharacter => data.hostile,
                _ => false,
            };
            if !hurts_target {
                return false;
            }

            let hit = Hit::damage(data.damage);
            let source = projectile.world_box().center();
            if let Some(projectile) = actors.get_mut(primary) {
                projectile.mark_removed();
            }
            let died = hit_actor(actors, other, &hit, Some(source), combat);
            events.push(CollisionEvent::Hit {
                target: other,
                source: primary,
                died,
            });
            true
        }
        Response::DoorContact => {
            let is_door = actors.get(other).map_or(false, |area| area.door_destination().is_some());
            if is_door {
                events.push(CollisionEvent::DoorContact { door: other });
            }
            is_door
        }
    }
}

/// Move `mover` out of `solid` along the axis needing the smaller shift and
/// stop it along that axis
pub fn push_out(mover: &mut Actor, solid: &Actor) {
    let push = penetration_vector(mover.hitbox(), mover.position, solid.hitbox(), solid.position);
    if push.x.abs() < push.y.abs() {
        mover.position.x += push.x;
        mover.velocity.x = 0.0;
    } else {
        mover.position.y += push.y;
        mover.velocity.y = 0.0;
    }
    log::trace!("{} pushed out of {} by {:?}", mover.name, solid.name, push);
}
