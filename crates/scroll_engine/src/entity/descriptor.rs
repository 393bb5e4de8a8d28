//! Serialized actor records as stored in room files

use super::{Actor, Area, AreaKind, Body, Facing};
use crate::config::{BoxSpec, EntityCatalog, EntityTemplate, SilhouetteBoxes};
use crate::foundation::math::Vec2;
use crate::world::{MapError, RoomId};
use serde::{Deserialize, Serialize};

/// What a descriptor builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DescriptorKind {
    /// Solid block sized in place
    Terrain {
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Solid movable block sized in place
    DynamicObstacle {
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Monster looked up in the entity catalog
    Monster,
    /// Friendly character looked up in the entity catalog
    NonPlayerCharacter,
    /// Door leading to another room
    Door {
        /// Room behind the door
        destination: RoomId,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Plain trigger area
    Area {
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
}

/// One actor of a room, before instantiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDescriptor {
    /// Catalog name (monsters, characters) or a label
    #[serde(default)]
    pub name: String,
    /// What to build
    pub kind: DescriptorKind,
    /// World x
    pub x: f32,
    /// World y
    pub y: f32,
    /// Initial facing
    #[serde(default)]
    pub facing: Facing,
}

impl ActorDescriptor {
    /// Descriptor at a position
    pub fn new(name: impl Into<String>, kind: DescriptorKind, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            x,
            y,
            facing: Facing::Right,
        }
    }

    /// Instantiate a fresh actor owned by `room`
    ///
    /// Sizes must be finite and non-negative and the position finite; a bad
    /// descriptor fails the room, never the loader.
    pub fn build(&self, room: &RoomId, catalog: &EntityCatalog, probe_thickness: f32) -> Result<Actor, MapError> {
        self.validate(room)?;
        let position = Vec2::new(self.x, self.y);
        let sized = |width: f32, height: f32| SilhouetteBoxes::uniform(BoxSpec::new(0.0, 0.0, width, height));

        let mut actor = match &self.kind {
            DescriptorKind::Terrain { width, height } => Actor::terrain(position, *width, *height, room.clone()),
            DescriptorKind::DynamicObstacle { width, height } => {
                Actor::new(self.label("Obstacle"), position, sized(*width, *height), Body::DynamicObstacle, room.clone())
            }
            DescriptorKind::Door { destination, width, height } => {
                Actor::door(position, *width, *height, destination.clone(), room.clone())
            }
            DescriptorKind::Area { width, height } => {
                let area = Area {
                    kind: AreaKind::Trigger,
                };
                Actor::new(self.label("Area"), position, sized(*width, *height), Body::Area(area), room.clone())
            }
            DescriptorKind::Monster => {
                let template = self.template(room, catalog)?;
                Actor::monster(self.name.clone(), position, template, probe_thickness, room.clone())
            }
            DescriptorKind::NonPlayerCharacter => {
                let template = self.template(room, catalog)?;
                let mut npc = Actor::new(self.name.clone(), position, template.boxes, Body::NonPlayerCharacter, room.clone());
                npc.gravity_affected = template.gravity;
                npc.friction = template.friction;
                npc
            }
        };

        actor.facing = self.facing;
        Ok(actor)
    }

    fn validate(&self, room: &RoomId) -> Result<(), MapError> {
        let invalid = |message: String| MapError::InvalidActor {
            room: room.clone(),
            name: self.label(self.kind_name()),
            message,
        };

        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(invalid(format!("position ({}, {}) is not finite", self.x, self.y)));
        }
        if let Some((width, height)) = self.size() {
            if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
                return Err(invalid(format!("size {}x{} must be finite and non-negative", width, height)));
            }
        }
        Ok(())
    }

    fn size(&self) -> Option<(f32, f32)> {
        match &self.kind {
            DescriptorKind::Terrain { width, height }
            | DescriptorKind::DynamicObstacle { width, height }
            | DescriptorKind::Door { width, height, .. }
            | DescriptorKind::Area { width, height } => Some((*width, *height)),
            DescriptorKind::Monster | DescriptorKind::NonPlayerCharacter => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            DescriptorKind::Terrain { .. } => "Terrain",
            DescriptorKind::DynamicObstacle { .. } => "Obstacle",
            DescriptorKind::Monster => "Monster",
            DescriptorKind::NonPlayerCharacter => "Character",
            DescriptorKind::Door { .. } => "Door",
            DescriptorKind::Area { .. } => "Area",
        }
    }

    fn template<'a>(&self, room: &RoomId, catalog: &'a EntityCatalog) -> Result<&'a EntityTemplate, MapError> {
        catalog.get(&self.name).ok_or_else(|| MapError::UnknownEntity {
            room: room.clone(),
            name: self.name.clone(),
        })
    }

    fn label(&self, fallback: &str) -> String {
        if self.name.is_empty() {
            fallback.to_string()
        } else {
            self.name.clone()
        }
    }
}
