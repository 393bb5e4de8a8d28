//! World layout and room streaming
//!
//! Rooms are loaded and unloaded as a unit. The [`RoomProvider`] describes the
//! map; the [`StreamingManager`] keeps the live actor collection holding
//! exactly the rooms reachable from the current one.

pub mod map;
pub mod room;
pub mod streaming;

pub use map::{MapError, MapLayout, RoomFile, RoomProvider, RonMapDirectory, WorldMap};
pub use room::{RoomExtent, RoomId, RoomInfo};
pub use streaming::{reachable_rooms, SpliceReport, StreamingError, StreamingManager, StreamingRequest};
