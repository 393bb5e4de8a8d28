//! Room/map providers
//!
//! A provider answers two questions: how the rooms are laid out (extents and
//! door graph, read-only and shared freely across threads) and which actors a
//! room contains. `load_room` may do file I/O and is only ever called from the
//! streaming worker.

use super::{RoomId, RoomInfo};
use crate::entity::ActorDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Room provider errors
#[derive(Debug, Error)]
pub enum MapError {
    /// A file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A file could not be parsed
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The layout does not know the room
    #[error("Unknown room: {0}")]
    UnknownRoom(RoomId),

    /// A descriptor names an entity missing from the catalog
    #[error("Unknown entity '{name}' in room {room}")]
    UnknownEntity {
        /// Room being loaded
        room: RoomId,
        /// Entity name
        name: String,
    },

    /// A descriptor carries an unusable size or position
    #[error("Invalid actor '{name}' in room {room}: {message}")]
    InvalidActor {
        /// Room being loaded
        room: RoomId,
        /// Descriptor name or kind
        name: String,
        /// What was wrong
        message: String,
    },
}

/// Source of room layouts and room contents
pub trait RoomProvider: Send + Sync {
    /// Extent and doors of a room
    fn room_info(&self, room: &RoomId) -> Option<&RoomInfo>;

    /// Actor descriptors of a room
    fn load_room(&self, room: &RoomId) -> Result<Vec<ActorDescriptor>, MapError>;
}

/// Every room's layout entry, as stored in `map.ron`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Layout entries by room
    pub rooms: BTreeMap<RoomId, RoomInfo>,
}

/// Contents of `<room>.ron`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomFile {
    /// Actors of the room
    pub actors: Vec<ActorDescriptor>,
}

/// In-memory provider
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    layout: MapLayout,
    contents: BTreeMap<RoomId, Vec<ActorDescriptor>>,
}

impl WorldMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a room
    pub fn add_room(&mut self, room: RoomId, info: RoomInfo, actors: Vec<ActorDescriptor>) {
        self.layout.rooms.insert(room.clone(), info);
        self.contents.insert(room, actors);
    }

    /// Room layout
    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }
}

impl RoomProvider for WorldMap {
    fn room_info(&self, room: &RoomId) -> Option<&RoomInfo> {
        self.layout.rooms.get(room)
    }

    fn load_room(&self, room: &RoomId) -> Result<Vec<ActorDescriptor>, MapError> {
        self.contents
            .get(room)
            .cloned()
            .ok_or_else(|| MapError::UnknownRoom(room.clone()))
    }
}

/// Provider backed by a directory of RON files
///
/// The layout is read once from `<dir>/map.ron`; each room's actors are read
/// from `<dir>/<room>.ron` every time the room is loaded.
#[derive(Debug, Clone)]
pub struct RonMapDirectory {
    root: PathBuf,
    layout: MapLayout,
}

impl RonMapDirectory {
    /// Name of the layout file inside the map directory
    pub const LAYOUT_FILE: &'static str = "map.ron";

    /// Open a map directory, reading its layout
    pub fn open(root: impl AsRef<Path>) -> Result<Self, MapError> {
        let root = root.as_ref().to_path_buf();
        let layout: MapLayout = read_ron(&root.join(Self::LAYOUT_FILE))?;
        log::info!("Opened map {} with {} rooms", root.display(), layout.rooms.len());
        Ok(Self { root, layout })
    }

    /// Room layout
    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    fn room_path(&self, room: &RoomId) -> PathBuf {
        self.root.join(format!("{}.ron", room.as_str()))
    }
}

impl RoomProvider for RonMapDirectory {
    fn room_info(&self, room: &RoomId) -> Option<&RoomInfo> {
        self.layout.rooms.get(room)
    }

    fn load_room(&self, room: &RoomId) -> Result<Vec<ActorDescriptor>, MapError> {
        if !self.layout.rooms.contains_key(room) {
            return Err(MapError::UnknownRoom(room.clone()));
        }
        let file: RoomFile = read_ron(&self.room_path(room))?;
        Ok(file.actors)
    }
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|e| MapError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
