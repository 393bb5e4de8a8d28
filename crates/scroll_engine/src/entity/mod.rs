//! Simulated actors
//!
//! Every simulated object is an [`Actor`]: shared kinematic state plus a
//! closed [`Body`] variant carrying the per-kind data (health for living
//! actors, probes and ammunition for the player, lifetime for projectiles).
//! Actors live in an [`ActorCollection`] and are addressed by generation-checked
//! [`ActorKey`] handles.

pub mod actor;
pub mod collection;
pub mod descriptor;
pub mod living;
pub mod player;

pub use actor::{Actor, Area, AreaKind, Body, Projectile, ProjectileKind};
pub use collection::ActorCollection;
pub use descriptor::{ActorDescriptor, DescriptorKind};
pub use living::{Hit, HitOutcome, Living};
pub use player::{AimDirection, Ammo, PlayerParts, WallContact};

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Handle to an actor in the live collection
    pub struct ActorKey;
}

/// Discrete kind tag, derived from the actor's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorKind {
    /// Solid level geometry
    Terrain,
    /// Beam, missile or grenade
    Projectile,
    /// The controlled character
    PlayerCharacter,
    /// Hostile living actor
    Monster,
    /// Non-solid trigger region (doors, ...)
    Area,
    /// Solid object that can move
    DynamicObstacle,
    /// Friendly, non-solid character
    NonPlayerCharacter,
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward -x
    Left,
    /// Facing toward +x
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Discrete behavior state
///
/// Animation selection is a function of this label, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorState {
    /// On the ground, no horizontal input
    #[default]
    Standing,
    /// On the ground, moving under input
    Walking,
    /// Rising from a standing jump
    Jumping,
    /// Rolled-up jump with horizontal input; uses the ball silhouette
    SpinJump,
    /// Rising from a jump off a wall
    WallJump,
    /// Airborne with no jump in progress
    Falling,
    /// Jump thrust over, still rising
    JumpEnd,
    /// On the ground, crouched
    Crouching,
}

impl ActorState {
    /// Collision silhouette this state uses
    pub fn silhouette(self) -> Silhouette {
        match self {
            Self::Crouching => Silhouette::Crouched,
            Self::SpinJump => Silhouette::Ball,
            _ => Silhouette::Standing,
        }
    }

    /// Whether the state belongs to the airborne branch
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            Self::Jumping | Self::SpinJump | Self::WallJump | Self::Falling | Self::JumpEnd
        )
    }
}

/// Collision shape family selected by the actor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Silhouette {
    /// Full-height box
    #[default]
    Standing,
    /// Reduced-height box
    Crouched,
    /// Small square box
    Ball,
}
