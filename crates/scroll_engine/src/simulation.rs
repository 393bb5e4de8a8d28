//! Simulation root
//!
//! Owns the live actor collection and runs the fixed tick:
//! input → movement → weapons → physics → doors → streaming poll.
//!
//! The configuration is an immutable snapshot behind an `Arc`. A new snapshot
//! handed to [`Simulation::swap_config`] is only picked up at the start of the
//! next tick, so a tick never sees two configurations.

use crate::config::catalog::{BEAM, GRENADE, MISSILE, PLAYER};
use crate::config::{ConfigError, EntityCatalog, SimulationConfig};
use crate::entity::{Actor, ActorCollection, ActorKey, Hit, ProjectileKind};
use crate::foundation::math::Vec2;
use crate::foundation::time::TickClock;
use crate::input::{Actions, InputSet};
use crate::movement;
use crate::physics::{self, CollisionEvent, PhysicsEngine, PhysicsReport};
use crate::world::{MapError, RoomId, RoomProvider, SpliceReport, StreamingManager};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while setting a simulation up
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration or catalog failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The map does not know the requested room
    #[error("Map error: {0}")]
    Map(#[from] MapError),
}

/// What happened during one tick
#[derive(Debug)]
pub struct TickReport {
    /// Index of the tick just run
    pub tick: u64,
    /// Physics events and removals
    pub physics: PhysicsReport,
    /// Room entered through a door this tick
    pub entered_room: Option<RoomId>,
    /// Streaming splice performed this tick
    pub splice: Option<SpliceReport>,
}

/// The simulation core
pub struct Simulation {
    config: Arc<SimulationConfig>,
    staged_config: Option<Arc<SimulationConfig>>,
    catalog: Arc<EntityCatalog>,
    actors: ActorCollection,
    input: InputSet,
    physics: PhysicsEngine,
    streaming: StreamingManager,
    current_room: RoomId,
    clock: TickClock,
}

impl Simulation {
    /// Build a simulation with the player at `spawn` in `start_room`
    ///
    /// Validates the configuration and catalog, then loads the start room and
    /// its neighbours with a blocking flush.
    pub fn new(
        config: Arc<SimulationConfig>,
        catalog: Arc<EntityCatalog>,
        provider: Arc<dyn RoomProvider>,
        start_room: RoomId,
        spawn: Vec2,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        catalog.validate()?;
        if provider.room_info(&start_room).is_none() {
            return Err(MapError::UnknownRoom(start_room).into());
        }

        let player_template = catalog
            .get(PLAYER)
            .ok_or_else(|| ConfigError::Invalid(format!("entity catalog has no '{}' entry", PLAYER)))?;
        let player = Actor::player(spawn, player_template, config.physics.probe_thickness, start_room.clone());

        let mut streaming = StreamingManager::new(provider, Arc::clone(&catalog), config.physics.probe_thickness);
        streaming.set_enabled(config.streaming.enabled);

        let mut actors = ActorCollection::new();
        actors.spawn(player);
        let report = streaming.flush(&start_room, &mut actors);

        log::info!(
            "Simulation started in room {} with {} actors ({} rooms loaded)",
            start_room,
            actors.len(),
            report.loaded.len()
        );

        Ok(Self {
            clock: TickClock::new(config.physics.tick_rate),
            config,
            staged_config: None,
            catalog,
            actors,
            input: InputSet::new(),
            physics: PhysicsEngine::new(),
            streaming,
            current_room: start_room,
        })
    }

    /// Run one fixed tick with the given actions held
    pub fn tick(&mut self, held: Actions) -> TickReport {
        self.apply_staged_config();
        let config = Arc::clone(&self.config);

        self.input.advance(held);
        if let Some(player) = self.actors.player_mut() {
            movement::drive(player, &self.input, &config.movement);
        }
        self.fire_weapons();

        let physics = self.physics.step(&config, &mut self.actors);
        let entered_room = self.follow_doors(&physics.events);
        let splice = self.streaming.poll(&self.current_room, &mut self.actors);

        let tick = self.clock.ticks();
        self.clock.advance();

        TickReport {
            tick,
            physics,
            entered_room,
            splice,
        }
    }

    /// Damage a living actor; returns whether it is dead afterwards
    ///
    /// Zero `amount` applies knockback only and leaves the invulnerability
    /// timer alone; `forced` hits ignore the timer. Knockback pushes away
    /// from `source` when given. Non-living or stale targets are ignored.
    pub fn apply_hit(
        &mut self,
        target: ActorKey,
        amount: u32,
        source: Option<ActorKey>,
        knockback: Vec2,
        forced: bool,
    ) -> bool {
        let source_point = source
            .and_then(|key| self.actors.get(key))
            .map(|actor| actor.world_box().center());
        let mut hit = Hit::damage(amount).with_knockback(knockback.x, knockback.y);
        if forced {
            hit = hit.forced();
        }
        physics::hit_actor(&mut self.actors, target, &hit, source_point, &self.config.combat)
    }

    /// Stage a new configuration snapshot for the next tick boundary
    pub fn swap_config(&mut self, config: Arc<SimulationConfig>) -> Result<(), ConfigError> {
        config.validate()?;
        self.staged_config = Some(config);
        Ok(())
    }

    /// Move the player to another room and load around it, blocking
    ///
    /// For respawns and scripted warps outside the tick loop.
    pub fn teleport(&mut self, room: RoomId, position: Vec2) -> Result<SpliceReport, MapError> {
        if self.streaming.provider().room_info(&room).is_none() {
            return Err(MapError::UnknownRoom(room));
        }
        if let Some(player) = self.actors.player_mut() {
            player.position = position;
            player.velocity = Vec2::zeros();
            player.room = room.clone();
        }
        log::info!("Teleported to room {}", room);
        self.current_room = room;
        Ok(self.streaming.flush(&self.current_room, &mut self.actors))
    }

    /// Current configuration snapshot
    pub fn config(&self) -> &Arc<SimulationConfig> {
        &self.config
    }

    /// Entity catalog
    pub fn catalog(&self) -> &Arc<EntityCatalog> {
        &self.catalog
    }

    /// Live actors
    pub fn actors(&self) -> &ActorCollection {
        &self.actors
    }

    /// Live actors, mutably (gameplay collaborators spawning or editing actors)
    pub fn actors_mut(&mut self) -> &mut ActorCollection {
        &mut self.actors
    }

    /// The player character
    pub fn player(&self) -> Option<&Actor> {
        self.actors.player()
    }

    /// Handle of the player character
    pub fn player_key(&self) -> Option<ActorKey> {
        self.actors.player_key()
    }

    /// Whether the player's health reached zero
    pub fn player_dead(&self) -> bool {
        self.player()
            .and_then(Actor::living)
            .map_or(false, |living| living.is_dead())
    }

    /// Room the player is in
    pub fn current_room(&self) -> &RoomId {
        &self.current_room
    }

    /// Tick counter
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Input of the last tick
    pub fn input(&self) -> &InputSet {
        &self.input
    }

    /// Room streaming manager
    pub fn streaming(&self) -> &StreamingManager {
        &self.streaming
    }

    fn apply_staged_config(&mut self) {
        let Some(config) = self.staged_config.take() else {
            return;
        };
        self.clock.set_tick_rate(config.physics.tick_rate);
        self.streaming.set_enabled(config.streaming.enabled);
        self.streaming.set_probe_thickness(config.physics.probe_thickness);
        self.config = config;
        log::info!("Configuration snapshot swapped at tick {}", self.clock.ticks());
    }

    fn fire_weapons(&mut self) {
        let mut kinds = Vec::new();
        if self.input.just_pressed(Actions::SHOOT) {
            kinds.push(ProjectileKind::Beam);
        }
        if self.input.just_pressed(Actions::MISSILE) {
            kinds.push(ProjectileKind::Missile);
        }
        if self.input.just_pressed(Actions::GRENADE) {
            kinds.push(ProjectileKind::Grenade);
        }
        if kinds.is_empty() {
            return;
        }

        let Some(player) = self.actors.player_mut() else {
            return;
        };
        let origin = player.world_box().center();
        let facing = player.facing;
        let Some(parts) = player.player_parts_mut() else {
            return;
        };
        let direction = parts.aim.vector(facing);

        let mut shots = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let (name, available) = match kind {
                ProjectileKind::Beam => (BEAM, true),
                ProjectileKind::Missile => (MISSILE, parts.ammo.take_missile()),
                ProjectileKind::Grenade => (GRENADE, parts.ammo.take_grenade()),
            };
            if available {
                shots.push((kind, name));
            } else {
                log::debug!("Out of ammunition for {:?}", kind);
            }
        }

        for (kind, name) in shots {
            let Some(template) = self.catalog.get(name) else {
                log::warn!("No template for projectile {}", name);
                continue;
            };
            let shot = Actor::projectile(kind, origin, direction, template, false, self.current_room.clone());
            self.actors.spawn(shot);
        }
    }

    /// Enter a door's destination once the player's centre is inside it
    fn follow_doors(&mut self, events: &[CollisionEvent]) -> Option<RoomId> {
        let center = self.actors.player()?.world_box().center();

        let destination = events.iter().find_map(|event| {
            let CollisionEvent::DoorContact { door } = event else {
                return None;
            };
            let destination = self.actors.get(*door)?.door_destination()?;
            if *destination == self.current_room {
                return None;
            }
            let info = self.streaming.provider().room_info(destination)?;
            info.extent.contains(center).then(|| destination.clone())
        })?;

        if let Some(player) = self.actors.player_mut() {
            player.room = destination.clone();
        }
        log::info!("Entered room {} from {}", destination, self.current_room);
        self.current_room = destination.clone();
        Some(destination)
    }
}
