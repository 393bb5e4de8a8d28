//! # Entity Catalog
//!
//! Read-only lookup of per-entity tuning, keyed by entity name: collision box
//! sizes for each silhouette, health and damage, gravity and friction, and
//! projectile stats. Room descriptors and the projectile spawner resolve
//! names against it.

use super::{Config, ConfigError};
use crate::entity::Silhouette;
use crate::geometry::CollisionBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized box offset and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Horizontal offset from the actor position
    pub x: f32,
    /// Vertical offset from the actor position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoxSpec {
    /// Box with its top-left corner at the given offset
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build the collision box
    pub fn to_box(self) -> CollisionBox {
        CollisionBox::new(self.x, self.y, self.width, self.height)
    }
}

/// Box sizes for each silhouette; missing shapes fall back to the standing one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilhouetteBoxes {
    /// Full-height box
    pub standing: BoxSpec,
    /// Crouched box
    #[serde(default)]
    pub crouched: Option<BoxSpec>,
    /// Ball box
    #[serde(default)]
    pub ball: Option<BoxSpec>,
}

impl SilhouetteBoxes {
    /// Single shape for every silhouette
    pub fn uniform(standing: BoxSpec) -> Self {
        Self {
            standing,
            crouched: None,
            ball: None,
        }
    }

    /// Spec for a silhouette
    pub fn spec(&self, silhouette: Silhouette) -> BoxSpec {
        match silhouette {
            Silhouette::Standing => self.standing,
            Silhouette::Crouched => self.crouched.unwrap_or(self.standing),
            Silhouette::Ball => self.ball.unwrap_or(self.standing),
        }
    }
}

/// Tuning for one named entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTemplate {
    /// Collision shapes
    pub boxes: SilhouetteBoxes,
    /// Maximum (and starting) health for living actors
    pub max_health: u32,
    /// Contact or projectile damage
    pub damage: u32,
    /// Whether gravity applies
    pub gravity: bool,
    /// Friction coefficient the actor starts with
    pub friction: f32,
    /// Launch speed (projectiles)
    pub speed: f32,
    /// Seconds before removal (projectiles)
    pub lifetime: f32,
    /// Grenade capacity (player)
    pub max_grenades: u32,
    /// Missile capacity (player)
    pub max_missiles: u32,
}

impl Default for EntityTemplate {
    fn default() -> Self {
        Self {
            boxes: SilhouetteBoxes::uniform(BoxSpec::new(0.0, 0.0, 16.0, 16.0)),
            max_health: 0,
            damage: 0,
            gravity: false,
            friction: 0.0,
            speed: 0.0,
            lifetime: 0.0,
            max_grenades: 0,
            max_missiles: 0,
        }
    }
}

/// Name of the player character template
pub const PLAYER: &str = "Player";
/// Name of the beam projectile template
pub const BEAM: &str = "Beam";
/// Name of the missile projectile template
pub const MISSILE: &str = "Missile";
/// Name of the grenade projectile template
pub const GRENADE: &str = "Grenade";

/// Named entity templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCatalog {
    /// Templates by entity name
    pub entities: BTreeMap<String, EntityTemplate>,
}

impl EntityCatalog {
    /// Look up a template
    pub fn get(&self, name: &str) -> Option<&EntityTemplate> {
        self.entities.get(name)
    }

    /// Add or replace a template
    pub fn insert(&mut self, name: impl Into<String>, template: EntityTemplate) {
        self.entities.insert(name.into(), template);
    }

    /// Check sizes and the templates the simulation spawns by itself
    pub fn validate(&self) -> Result<(), ConfigError> {
        for required in [PLAYER, BEAM, MISSILE, GRENADE] {
            if !self.entities.contains_key(required) {
                return Err(ConfigError::Invalid(format!("entity catalog has no '{}' entry", required)));
            }
        }

        for (name, template) in &self.entities {
            let boxes = &template.boxes;
            let specs = [Some(boxes.standing), boxes.crouched, boxes.ball];
            for spec in specs.into_iter().flatten() {
                if !(spec.width >= 0.0 && spec.height >= 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "entity '{}' has a box with negative size {}x{}",
                        name, spec.width, spec.height
                    )));
                }
            }
            if template.friction < 0.0 {
                return Err(ConfigError::Invalid(format!("entity '{}' has negative friction", name)));
            }
        }

        Ok(())
    }
}

impl Default for EntityCatalog {
    /// Built-in templates: the player, the three projectiles and one crawling monster
    fn default() -> Self {
        let mut entities = BTreeMap::new();

        entities.insert(PLAYER.to_string(), EntityTemplate {
            boxes: SilhouetteBoxes {
                standing: BoxSpec::new(-10.0, -48.0, 20.0, 48.0),
                crouched: Some(BoxSpec::new(-10.0, -30.0, 20.0, 30.0)),
                ball: Some(BoxSpec::new(-8.0, -16.0, 16.0, 16.0)),
            },
            max_health: 99,
            gravity: true,
            friction: 0.005,
            max_grenades: 10,
            max_missiles: 10,
            ..EntityTemplate::default()
        });

        entities.insert(BEAM.to_string(), EntityTemplate {
            boxes: SilhouetteBoxes::uniform(BoxSpec::new(-3.0, -3.0, 6.0, 6.0)),
            damage: 1,
            speed: 800.0,
            lifetime: 0.5,
            ..EntityTemplate::default()
        });

        entities.insert(MISSILE.to_string(), EntityTemplate {
            boxes: SilhouetteBoxes::uniform(BoxSpec::new(-6.0, -3.0, 12.0, 6.0)),
            damage: 5,
            speed: 600.0,
            lifetime: 2.0,
            ..EntityTemplate::default()
        });

        entities.insert(GRENADE.to_string(), EntityTemplate {
            boxes: SilhouetteBoxes::uniform(BoxSpec::new(-4.0, -4.0, 8.0, 8.0)),
            damage: 3,
            gravity: true,
            speed: 300.0,
            lifetime: 1.5,
            ..EntityTemplate::default()
        });

        entities.insert("Crawler".to_string(), EntityTemplate {
            boxes: SilhouetteBoxes::uniform(BoxSpec::new(-12.0, -16.0, 24.0, 16.0)),
            max_health: 5,
            damage: 8,
            gravity: true,
            friction: 0.005,
            ..EntityTemplate::default()
        });

        Self { entities }
    }
}

impl Config for EntityCatalog {}
