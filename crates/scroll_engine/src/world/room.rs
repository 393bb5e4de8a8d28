//! Room identifiers and layout records

use crate::foundation::math::Vec2;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a room
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap a room name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The room name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for RoomId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// World-space rectangle covered by a room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomExtent {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl RoomExtent {
    /// Extent from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Edges as a rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether a world point lies inside the room
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }
}

/// Layout entry of one room: where it is and where its doors lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Covered area
    pub extent: RoomExtent,
    /// Rooms reachable through this room's doors
    #[serde(default)]
    pub doors: Vec<RoomId>,
}
