//! Movement state machine for controlled actors
//!
//! Reads last tick's probe results and this tick's input, then writes the
//! next state, velocity, facing, friction and jump counter back onto the
//! actor. The collision shape follows the state later, in the physics step.

pub mod controller;

pub use controller::{horizontal_input, transition, MovementContext, MovementOutcome};

use crate::config::MovementConfig;
use crate::entity::{Actor, AimDirection, WallContact};
use crate::input::InputSet;

/// Snapshot the movement-relevant parts of an actor
pub fn context_of(actor: &Actor) -> MovementContext {
    let parts = actor.player_parts();
    MovementContext {
        state: actor.state,
        on_ground: actor.on_ground(),
        wall: parts.map_or(WallContact::NONE, |p| p.wall),
        jump_ticks: parts.map_or(0, |p| p.jump_ticks),
        velocity: actor.velocity,
        facing: actor.facing,
    }
}

/// Run one transition on a controlled living actor; returns the outcome applied
///
/// Non-living actors are left alone.
pub fn drive(actor: &mut Actor, input: &InputSet, config: &MovementConfig) -> Option<MovementOutcome> {
    actor.living()?;

    let context = context_of(actor);
    let outcome = transition(&context, input, config);

    if outcome.state != context.state {
        log::trace!("{}: {:?} -> {:?}", actor.name, context.state, outcome.state);
    }

    actor.state = outcome.state;
    actor.velocity = outcome.velocity;
    actor.facing = outcome.facing;
    actor.friction = outcome.friction;

    let airborne = !context.on_ground;
    if let Some(parts) = actor.player_parts_mut() {
        parts.jump_ticks = outcome.jump_ticks;
        parts.aim = AimDirection::from_input(input, airborne);
    }

    Some(outcome)
}
