//! The actor record and its per-kind body

use super::{ActorKind, ActorState, Ammo, Facing, Hit, Living, PlayerParts, Silhouette};
use crate::config::catalog::{BEAM, GRENADE, MISSILE, PLAYER};
use crate::config::{BoxSpec, EntityTemplate, SilhouetteBoxes};
use crate::foundation::math::{utils, Vec2};
use crate::geometry::{CollisionBox, Rect};
use crate::world::RoomId;

/// Projectile flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Unlimited beam shot
    Beam,
    /// Missile (uses ammunition)
    Missile,
    /// Grenade (uses ammunition, falls)
    Grenade,
}

/// Projectile data
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Flavour
    pub kind: ProjectileKind,
    /// Damage dealt on hit
    pub damage: u32,
    /// Seconds left before removal
    pub lifetime: f32,
    /// Fired by a monster (hurts the player) rather than by the player
    pub hostile: bool,
}

/// Area flavours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaKind {
    /// Passage to another room
    Door {
        /// Room on the other side
        destination: RoomId,
    },
    /// Plain trigger region
    Trigger,
}

/// Area data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    /// Flavour
    pub kind: AreaKind,
}

/// Per-kind actor data
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Solid level geometry
    Terrain,
    /// Solid movable object
    DynamicObstacle,
    /// Projectile in flight
    Projectile(Projectile),
    /// Trigger region
    Area(Area),
    /// Friendly character
    NonPlayerCharacter,
    /// Hostile living actor
    Monster(Living),
    /// The controlled character
    Player {
        /// Health and ground contact
        living: Living,
        /// Player-only data
        parts: PlayerParts,
    },
}

/// A simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Catalog name
    pub name: String,
    /// World position (feet for living actors)
    pub position: Vec2,
    /// Velocity in units/s
    pub velocity: Vec2,
    /// Facing direction
    pub facing: Facing,
    /// Discrete behavior state
    pub state: ActorState,
    /// Room that owns this actor
    pub room: RoomId,
    /// Whether gravity applies
    pub gravity_affected: bool,
    /// Friction coefficient
    pub friction: f32,
    /// Per-kind data
    pub body: Body,
    hitbox: CollisionBox,
    shapes: SilhouetteBoxes,
    silhouette: Silhouette,
    removed: bool,
}

impl Actor {
    /// General constructor; `shapes.standing` becomes the initial box
    pub fn new(name: impl Into<String>, position: Vec2, shapes: SilhouetteBoxes, body: Body, room: RoomId) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec2::zeros(),
            facing: Facing::Right,
            state: ActorState::Standing,
            room,
            gravity_affected: false,
            friction: 0.0,
            body,
            hitbox: shapes.standing.to_box(),
            shapes,
            silhouette: Silhouette::Standing,
            removed: false,
        }
    }

    /// Block of level geometry with its top-left corner at `position`
    pub fn terrain(position: Vec2, width: f32, height: f32, room: RoomId) -> Self {
        let shapes = SilhouetteBoxes::uniform(BoxSpec::new(0.0, 0.0, width, height));
        Self::new("Terrain", position, shapes, Body::Terrain, room)
    }

    /// Door area leading to `destination`
    pub fn door(position: Vec2, width: f32, height: f32, destination: RoomId, room: RoomId) -> Self {
        let shapes = SilhouetteBoxes::uniform(BoxSpec::new(0.0, 0.0, width, height));
        let body = Body::Area(Area {
            kind: AreaKind::Door { destination },
        });
        Self::new("Door", position, shapes, body, room)
    }

    /// The player character at full health and ammunition
    pub fn player(position: Vec2, template: &EntityTemplate, probe_thickness: f32, room: RoomId) -> Self {
        let hitbox = template.boxes.standing.to_box();
        let living = Living::new(template.max_health, template.damage, &hitbox, probe_thickness);
        let ammo = Ammo::full(template.max_grenades, template.max_missiles);
        let parts = PlayerParts::new(&hitbox, probe_thickness, ammo);
        let mut actor = Self::new(PLAYER, position, template.boxes, Body::Player { living, parts }, room);
        actor.gravity_affected = template.gravity;
        actor.friction = template.friction;
        actor
    }

    /// A monster built from its catalog template
    pub fn monster(name: impl Into<String>, position: Vec2, template: &EntityTemplate, probe_thickness: f32, room: RoomId) -> Self {
        let hitbox = template.boxes.standing.to_box();
        let living = Living::new(template.max_health, template.damage, &hitbox, probe_thickness);
        let mut actor = Self::new(name, position, template.boxes, Body::Monster(living), room);
        actor.gravity_affected = template.gravity;
        actor.friction = template.friction;
        actor
    }

    /// A projectile launched along `direction` (x, y) at the template speed
    pub fn projectile(
        kind: ProjectileKind,
        position: Vec2,
        direction: (f32, f32),
        template: &EntityTemplate,
        hostile: bool,
        room: RoomId,
    ) -> Self {
        let name = match kind {
            ProjectileKind::Beam => BEAM,
            ProjectileKind::Missile => MISSILE,
            ProjectileKind::Grenade => GRENADE,
        };
        let body = Body::Projectile(Projectile {
            kind,
            damage: template.damage,
            lifetime: template.lifetime,
            hostile,
        });
        let mut actor = Self::new(name, position, template.boxes, body, room);
        actor.velocity = Vec2::new(direction.0, direction.1) * template.speed;
        actor.gravity_affected = template.gravity;
        actor.friction = template.friction;
        actor.facing = if direction.0 < 0.0 { Facing::Left } else { Facing::Right };
        actor
    }

    /// Kind tag
    pub fn kind(&self) -> ActorKind {
        match self.body {
            Body::Terrain => ActorKind::Terrain,
            Body::DynamicObstacle => ActorKind::DynamicObstacle,
            Body::Projectile(_) => ActorKind::Projectile,
            Body::Area(_) => ActorKind::Area,
            Body::NonPlayerCharacter => ActorKind::NonPlayerCharacter,
            Body::Monster(_) => ActorKind::Monster,
            Body::Player { .. } => ActorKind::PlayerCharacter,
        }
    }

    /// Whether other bodies are pushed out of this one
    pub fn is_solid(&self) -> bool {
        matches!(self.body, Body::Terrain | Body::DynamicObstacle)
    }

    /// Living data, for monsters and the player
    pub fn living(&self) -> Option<&Living> {
        match &self.body {
            Body::Monster(living) | Body::Player { living, .. } => Some(living),
            _ => None,
        }
    }

    /// Mutable living data
    pub fn living_mut(&mut self) -> Option<&mut Living> {
        match &mut self.body {
            Body::Monster(living) | Body::Player { living, .. } => Some(living),
            _ => None,
        }
    }

    /// Player-only data
    pub fn player_parts(&self) -> Option<&PlayerParts> {
        match &self.body {
            Body::Player { parts, .. } => Some(parts),
            _ => None,
        }
    }

    /// Mutable player-only data
    pub fn player_parts_mut(&mut self) -> Option<&mut PlayerParts> {
        match &mut self.body {
            Body::Player { parts, .. } => Some(parts),
            _ => None,
        }
    }

    /// Projectile data
    pub fn projectile_data(&self) -> Option<&Projectile> {
        match &self.body {
            Body::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    /// Mutable projectile data
    pub fn projectile_data_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.body {
            Body::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    /// Room behind this actor, if it is a door
    pub fn door_destination(&self) -> Option<&RoomId> {
        match &self.body {
            Body::Area(Area {
                kind: AreaKind::Door { destination },
            }) => Some(destination),
            _ => None,
        }
    }

    /// Whether the ground probe touched terrain last pass (false for non-living actors)
    pub fn on_ground(&self) -> bool {
        self.living().map_or(false, |living| living.on_ground)
    }

    /// Current health (None for non-living actors)
    pub fn health(&self) -> Option<u32> {
        self.living().map(Living::health)
    }

    /// Primary collision box
    pub fn hitbox(&self) -> &CollisionBox {
        &self.hitbox
    }

    /// Primary box in world space
    pub fn world_box(&self) -> Rect {
        self.hitbox.at(self.position)
    }

    /// Current silhouette
    pub fn silhouette(&self) -> Silhouette {
        self.silhouette
    }

    /// Box this actor would have in `silhouette`, anchored at the current feet
    pub fn box_for(&self, silhouette: Silhouette) -> CollisionBox {
        let spec = self.shapes.spec(silhouette);
        self.hitbox.resized_at_feet(spec.width, spec.height)
    }

    /// Swap in a new primary box and rebuild the probes that follow it
    pub fn replace_shape(&mut self, silhouette: Silhouette, hitbox: CollisionBox, probe_thickness: f32) {
        self.hitbox = hitbox;
        self.silhouette = silhouette;
        match &mut self.body {
            Body::Monster(living) => living.replace_ground_probe(hitbox.ground_probe(probe_thickness)),
            Body::Player { living, parts } => {
                living.replace_ground_probe(hitbox.ground_probe(probe_thickness));
                parts.replace_wall_probes(&hitbox, probe_thickness);
            }
            _ => {}
        }
    }

    /// Flag for removal at the end of the physics pass
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Whether removal is pending
    pub fn is_marked_removed(&self) -> bool {
        self.removed
    }

    /// Apply a hit to this actor; returns whether it is dead afterwards
    ///
    /// Knockback pushes away from `source` horizontally (or backwards from
    /// the facing direction when there is no source) and upward. Non-living
    /// actors ignore hits.
    pub fn apply_hit(&mut self, hit: &Hit, source: Option<Vec2>, invulnerability_seconds: f32) -> bool {
        let center = self.world_box().center();
        let backwards = -self.facing.sign();
        let Some(living) = self.living_mut() else {
            return false;
        };

        let outcome = living.take_hit(hit, invulnerability_seconds);
        let dead = living.is_dead();

        if outcome.applies_knockback() && hit.knockback != Vec2::zeros() {
            let away = source
                .map(|from| utils::sign(center.x - from.x))
                .filter(|sign| *sign != 0.0)
                .unwrap_or(backwards);
            self.velocity = Vec2::new(away * hit.knockback.x.abs(), -hit.knockback.y.abs());
        }

        log::trace!("{} hit for {} ({:?}), dead: {}", self.name, hit.amount, outcome, dead);
        dead
    }
}
