//! Player-only data: wall probes, ammunition, jump sustain and aim

use super::Facing;
use crate::geometry::CollisionBox;
use crate::input::{Actions, InputSet};
use serde::{Deserialize, Serialize};

/// Which wall probes touch solid geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallContact {
    /// Left probe touches
    pub left: bool,
    /// Right probe touches
    pub right: bool,
}

impl WallContact {
    /// No wall on either side
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    /// Whether either probe touches
    pub fn any(self) -> bool {
        self.left || self.right
    }

    /// Direction pointing away from the touched wall
    ///
    /// With walls on both sides there is no way out, so `None`.
    pub fn away(self) -> Option<Facing> {
        match (self.left, self.right) {
            (true, false) => Some(Facing::Right),
            (false, true) => Some(Facing::Left),
            _ => None,
        }
    }
}

/// Ammunition counters with their maxima
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ammo {
    /// Grenades left
    pub grenades: u32,
    /// Grenade capacity
    pub max_grenades: u32,
    /// Missiles left
    pub missiles: u32,
    /// Missile capacity
    pub max_missiles: u32,
}

impl Ammo {
    /// Full counters
    pub fn full(max_grenades: u32, max_missiles: u32) -> Self {
        Self {
            grenades: max_grenades,
            max_grenades,
            missiles: max_missiles,
            max_missiles,
        }
    }

    /// Take one grenade if any are left
    pub fn take_grenade(&mut self) -> bool {
        if self.grenades == 0 {
            return false;
        }
        self.grenades -= 1;
        true
    }

    /// Take one missile if any are left
    pub fn take_missile(&mut self) -> bool {
        if self.missiles == 0 {
            return false;
        }
        self.missiles -= 1;
        true
    }
}

/// Weapon aim relative to the facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimDirection {
    /// Straight ahead
    #[default]
    Forward,
    /// Straight up
    Up,
    /// Straight down (airborne only)
    Down,
    /// Ahead and up
    UpDiagonal,
    /// Ahead and down
    DownDiagonal,
}

impl AimDirection {
    /// Aim from held inputs; aiming straight down is only possible in the air
    pub fn from_input(input: &InputSet, airborne: bool) -> Self {
        let horizontal = input.is_held(Actions::LEFT) != input.is_held(Actions::RIGHT);
        let up = input.is_held(Actions::UP);
        let down = input.is_held(Actions::DOWN);

        match (up, down, horizontal) {
            (true, false, true) => Self::UpDiagonal,
            (true, false, false) => Self::Up,
            (false, true, true) => Self::DownDiagonal,
            (false, true, false) if airborne => Self::Down,
            _ => Self::Forward,
        }
    }

    /// Unit-ish direction vector (x, y) for a shot, +y down
    pub fn vector(self, facing: Facing) -> (f32, f32) {
        let forward = facing.sign();
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            Self::Forward => (forward, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::UpDiagonal => (forward * diagonal, -diagonal),
            Self::DownDiagonal => (forward * diagonal, diagonal),
        }
    }
}

/// Data only the player character carries
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerParts {
    wall_probe_left: CollisionBox,
    wall_probe_right: CollisionBox,
    /// Wall probe results from the last physics pass
    pub wall: WallContact,
    /// Ammunition
    pub ammo: Ammo,
    /// Ticks of jump sustain already used in the current jump
    pub jump_ticks: u32,
    /// Current aim
    pub aim: AimDirection,
}

impl PlayerParts {
    /// Player data with wall probes on each side of `body`
    pub fn new(body: &CollisionBox, probe_thickness: f32, ammo: Ammo) -> Self {
        Self {
            wall_probe_left: body.left_probe(probe_thickness),
            wall_probe_right: body.right_probe(probe_thickness),
            wall: WallContact::NONE,
            ammo,
            jump_ticks: 0,
            aim: AimDirection::Forward,
        }
    }

    /// Left wall probe
    pub fn wall_probe_left(&self) -> &CollisionBox {
        &self.wall_probe_left
    }

    /// Right wall probe
    pub fn wall_probe_right(&self) -> &CollisionBox {
        &self.wall_probe_right
    }

    /// Rebuild both wall probes around a new body box
    pub fn replace_wall_probes(&mut self, body: &CollisionBox, probe_thickness: f32) {
        self.wall_probe_left = body.left_probe(probe_thickness);
        self.wall_probe_right = body.right_probe(probe_thickness);
    }
}
