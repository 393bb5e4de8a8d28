//! Per-tick input set
//!
//! The windowing layer (or a replay script) reports which actions are held
//! each tick; the input set remembers for how many consecutive ticks each has
//! been held so the movement code can tell a fresh press from a long hold.

use bitflags::bitflags;

bitflags! {
    /// Named gameplay actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u16 {
        /// Move / face left
        const LEFT = 1 << 0;
        /// Move / face right
        const RIGHT = 1 << 1;
        /// Aim up
        const UP = 1 << 2;
        /// Aim down
        const DOWN = 1 << 3;
        /// Jump
        const JUMP = 1 << 4;
        /// Fire the beam
        const SHOOT = 1 << 5;
        /// Crouch
        const CROUCH = 1 << 6;
        /// Fire a missile
        const MISSILE = 1 << 7;
        /// Throw a grenade
        const GRENADE = 1 << 8;
    }
}

impl Actions {
    /// Parse an action name as used by input scripts and key maps
    pub fn from_action_name(name: &str) -> Option<Self> {
        let action = match name.trim().to_ascii_lowercase().as_str() {
            "left" => Self::LEFT,
            "right" => Self::RIGHT,
            "up" => Self::UP,
            "down" => Self::DOWN,
            "jump" => Self::JUMP,
            "shoot" => Self::SHOOT,
            "crouch" => Self::CROUCH,
            "missile" => Self::MISSILE,
            "grenade" => Self::GRENADE,
            _ => return None,
        };
        Some(action)
    }
}

const ACTION_COUNT: usize = 9;

/// Held actions for the current tick plus hold durations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    held: Actions,
    held_ticks: [u32; ACTION_COUNT],
}

impl InputSet {
    /// Empty input set (nothing held)
    pub fn new() -> Self {
        Self::default()
    }

    /// Input set where `actions` were just pressed this tick
    pub fn pressed(actions: Actions) -> Self {
        let mut input = Self::new();
        input.advance(actions);
        input
    }

    /// Record the actions held for a new tick
    ///
    /// Durations of actions held last tick and still held grow by one;
    /// newly pressed actions start at zero; released ones reset.
    pub fn advance(&mut self, now_held: Actions) {
        for (index, flag) in Actions::all().iter().enumerate() {
            if now_held.contains(flag) {
                if self.held.contains(flag) {
                    self.held_ticks[index] = self.held_ticks[index].saturating_add(1);
                } else {
                    self.held_ticks[index] = 0;
                }
            } else {
                self.held_ticks[index] = 0;
            }
        }
        self.held = now_held;
    }

    /// All actions held this tick
    pub fn held(&self) -> Actions {
        self.held
    }

    /// Whether every action in `actions` is held
    pub fn is_held(&self, actions: Actions) -> bool {
        self.held.contains(actions)
    }

    /// Whether `action` went down this tick
    pub fn just_pressed(&self, action: Actions) -> bool {
        self.is_held(action) && self.held_for(action) == Some(0)
    }

    /// Consecutive ticks `action` has been held before this one, `None` when released
    pub fn held_for(&self, action: Actions) -> Option<u32> {
        if !self.is_held(action) {
            return None;
        }
        Actions::all()
            .iter()
            .position(|flag| flag == action)
            .map(|index| self.held_ticks[index])
    }
}
