//! # Scroll Engine
//!
//! Simulation core for a frame-stepped 2D side-scrolling action game.
//!
//! ## Features
//!
//! - **Physics**: gravity, multiplicative friction, box push-out, ground and wall probes
//! - **Movement**: explicit state machine for the controlled character
//! - **Room Streaming**: background loading and unloading of neighbouring rooms
//! - **Configuration**: validated TOML/RON snapshots and an entity catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scroll_engine::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(SimulationConfig::default());
//!     let catalog = Arc::new(EntityCatalog::default());
//!     let map = Arc::new(RonMapDirectory::open("assets/map")?);
//!
//!     let mut simulation = Simulation::new(config, catalog, map, RoomId::from("Start"), Vec2::new(64.0, 400.0))?;
//!     for _ in 0..60 {
//!         simulation.tick(Actions::RIGHT);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod entity;
pub mod foundation;
pub mod geometry;
pub mod input;
pub mod movement;
pub mod physics;
pub mod simulation;
pub mod world;

#[cfg(test)]
mod tests;

pub use simulation::{Simulation, SimulationError, TickReport};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EntityCatalog, SimulationConfig},
        entity::{Actor, ActorCollection, ActorKey, ActorKind, ActorState, Facing},
        foundation::math::Vec2,
        input::{Actions, InputSet},
        simulation::{Simulation, SimulationError, TickReport},
        world::{MapError, RonMapDirectory, RoomId, RoomProvider, WorldMap},
    };
}
