//! Whole-tick scenario tests


use crate::config::{EntityCatalog, SimulationConfig};
use crate::entity::{ActorDescriptor, DescriptorKind};
use crate::foundation::math::Vec2;
use crate::input::Actions;
use crate::simulation::Simulation;
use crate::world::{RoomExtent, RoomId, RoomInfo, WorldMap};
use std::sync::Arc;

pub(crate) fn floor(x: f32, width: f32) -> ActorDescriptor {
    ActorDescriptor::new("", DescriptorKind::Terrain { width, height: 32.0 }, x, 0.0)
}

pub(crate) fn door(x: f32, to: &str) -> ActorDescriptor {
    let kind = DescriptorKind::Door {
        destination: RoomId::from(to),
        width: 8.0,
        height: 64.0,
    };
    ActorDescriptor::new("", kind, x, -64.0)
}

pub(crate) fn room_info(x: f32, width: f32, doors: &[&str]) -> RoomInfo {
    RoomInfo {
        extent: RoomExtent::new(x, -1000.0, width, 1100.0),
        doors: doors.iter().map(|d| RoomId::from(*d)).collect(),
    }
}

/// One wide room with a floor whose top edge is y = 0
pub(crate) fn flat_world() -> WorldMap {
    let mut map = WorldMap::new();
    map.add_room(RoomId::from("A"), room_info(-2000.0, 4000.0, &[]), vec![floor(-2000.0, 4000.0)]);
    map
}

/// C | A | B side by side; C's door leads into A, A and B link to each other
pub(crate) fn three_rooms() -> WorldMap {
    let mut map = WorldMap::new();
    map.add_room(
        RoomId::from("C"),
        room_info(-1000.0, 1000.0, &["A"]),
        vec![floor(-1000.0, 1000.0), door(-8.0, "A")],
    );
    map.add_room(
        RoomId::from("A"),
        room_info(0.0, 1000.0, &["B"]),
        vec![floor(0.0, 1000.0), door(992.0, "B")],
    );
    map.add_room(
        RoomId::from("B"),
        room_info(1000.0, 1000.0, &["A"]),
        vec![
            floor(1000.0, 1000.0),
            door(1000.0, "A"),
            ActorDescriptor::new("Crawler", DescriptorKind::Monster, 1500.0, 0.0),
        ],
    );
    map
}

pub(crate) fn simulation(map: WorldMap, start: &str, spawn: Vec2) -> Simulation {
    Simulation::new(
        Arc::new(SimulationConfig::default()),
        Arc::new(EntityCatalog::default()),
        Arc::new(map),
        RoomId::from(start),
        spawn,
    )
    .unwrap()
}

/// One idle tick so the probes report the floor
pub(crate) fn settle(simulation: &mut Simulation) {
    simulation.tick(Actions::empty());
    assert!(simulation.player().unwrap().on_ground());
}
