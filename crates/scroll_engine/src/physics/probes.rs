//! Ground and wall probes, and guarded collision-shape changes

use crate::entity::{Actor, ActorCollection, ActorKey, ActorState, Body, Silhouette, WallContact};
use crate::foundation::math::Vec2;
use crate::geometry::{CollisionBox, Rect};

/// World boxes of every solid actor, for probe tests
pub fn solid_rects(actors: &ActorCollection) -> Vec<Rect> {
    actors
        .iter()
        .filter(|(_, actor)| actor.is_solid() && !actor.is_marked_removed())
        .map(|(_, actor)| actor.world_box())
        .collect()
}

fn touches(probe: &CollisionBox, position: Vec2, solids: &[Rect]) -> bool {
    let probe = probe.at(position);
    solids.iter().any(|solid| probe.intersects(solid))
}

/// Recompute `on_ground` (and wall contact for the player) from the probes
pub fn update_contacts(actor: &mut Actor, solids: &[Rect]) {
    let position = actor.position;
    match &mut actor.body {
        Body::Monster(living) => {
            living.on_ground = touches(living.ground_probe(), position, solids);
        }
        Body::Player { living, parts } => {
            living.on_ground = touches(living.ground_probe(), position, solids);
            parts.wall = WallContact {
                left: touches(parts.wall_probe_left(), position, solids),
                right: touches(parts.wall_probe_right(), position, solids),
            };
        }
        _ => {}
    }
}

/// Whether `hitbox` at `position` would sit inside solid geometry
pub fn blocked(hitbox: &CollisionBox, position: Vec2, solids: &[Rect]) -> bool {
    touches(hitbox, position, solids)
}

/// Bring the actor's collision shape in line with its state
///
/// The new box is anchored at the feet. If it would overlap solid geometry
/// the change is refused and the state falls back to one matching the shape
/// the actor keeps (still crouched under a low ceiling, still a ball in a
/// low tunnel). Returns whether the shape changed.
pub fn sync_silhouette(actor: &mut Actor, solids: &[Rect], probe_thickness: f32) -> bool {
    let wanted = actor.state.silhouette();
    let current = actor.silhouette();
    if wanted == current {
        return false;
    }

    let candidate = actor.box_for(wanted);
    if blocked(&candidate, actor.position, solids) {
        actor.state = match current {
            Silhouette::Crouched => ActorState::Crouching,
            Silhouette::Ball => ActorState::SpinJump,
            Silhouette::Standing if actor.on_ground() => ActorState::Standing,
            Silhouette::Standing => ActorState::Falling,
        };
        log::trace!("{} kept {:?} shape, state now {:?}", actor.name, current, actor.state);
        return false;
    }

    actor.replace_shape(wanted, candidate, probe_thickness);
    true
}

/// Contacts and shape changes for every living actor, in collection order
pub fn update_all(actors: &mut ActorCollection, keys: &[ActorKey], probe_thickness: f32) {
    let solids = solid_rects(actors);
    for &key in keys {
        if let Some(actor) = actors.get_mut(key) {
            if actor.living().is_some() {
                update_contacts(actor, &solids);
                sync_silhouette(actor, &solids, probe_thickness);
            }
        }
    }
}
