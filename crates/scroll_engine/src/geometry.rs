//! Axis-aligned collision boxes and overlap tests
//!
//! A [`CollisionBox`] is stored relative to its owner's position; the free
//! functions here take the owner position alongside the box and work in world
//! space. Boxes are never mutated in place: a shape change builds a new box.

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle offset from an actor's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// World-space rectangle edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge (smaller y)
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge (larger y)
    pub bottom: f32,
}

impl Rect {
    /// Build a rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Whether the point lies inside (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Positive-area intersection test
    ///
    /// Degenerate (zero-width or zero-height) rectangles never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let width = self.right.min(other.right) - self.left.max(other.left);
        let height = self.bottom.min(other.bottom) - self.top.max(other.top);
        width > 0.0 && height > 0.0
    }
}

impl CollisionBox {
    /// Create a box; negative sizes are a programming error
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "box size must be non-negative: {}x{}", width, height);
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Horizontal offset from the owner position
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vertical offset from the owner position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Offset of the bottom edge from the owner position
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// World-space rectangle for an owner at `position`
    pub fn at(&self, position: Vec2) -> Rect {
        Rect::new(position.x + self.x, position.y + self.y, self.width, self.height)
    }

    /// Thin probe box spanning this box's width, directly below it
    pub fn ground_probe(&self, thickness: f32) -> Self {
        Self::new(self.x, self.bottom(), self.width, thickness)
    }

    /// Thin probe box spanning this box's height, directly to its left
    pub fn left_probe(&self, thickness: f32) -> Self {
        Self::new(self.x - thickness, self.y, thickness, self.height)
    }

    /// Thin probe box spanning this box's height, directly to its right
    pub fn right_probe(&self, thickness: f32) -> Self {
        Self::new(self.x + self.width, self.y, thickness, self.height)
    }

    /// New box of the given size, horizontally centred on this one and sharing its bottom edge
    pub fn resized_at_feet(&self, width: f32, height: f32) -> Self {
        Self::new(
            self.x + (self.width - width) * 0.5,
            self.bottom() - height,
            width,
            height,
        )
    }
}

/// True iff the two world-space boxes intersect with non-zero area
///
/// Touching edges do not count.
pub fn overlaps(box_a: &CollisionBox, pos_a: Vec2, box_b: &CollisionBox, pos_b: Vec2) -> bool {
    box_a.at(pos_a).intersects(&box_b.at(pos_b))
}

/// Per-axis translation that would move box A out of box B
///
/// Each component is the smallest shift along that axis alone; its sign says
/// which way A has to move. Only meaningful for overlapping boxes.
pub fn penetration_vector(box_a: &CollisionBox, pos_a: Vec2, box_b: &CollisionBox, pos_b: Vec2) -> Vec2 {
    let a = box_a.at(pos_a);
    let b = box_b.at(pos_b);
    let center_a = a.center();
    let center_b = b.center();

    let dx = if center_a.x < center_b.x {
        b.left - a.right
    } else {
        b.right - a.left
    };
    let dy = if center_a.y < center_b.y {
        b.top - a.bottom
    } else {
        b.bottom - a.top
    };

    Vec2::new(dx, dy)
}
