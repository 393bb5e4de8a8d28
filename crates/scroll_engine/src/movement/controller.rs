//! The movement transition table
//!
//! A pure function of (state, on-ground, wall contact, jump counter, velocity,
//! facing, input). Nothing here reads animation or touches the collection.

use crate::config::MovementConfig;
use crate::entity::{ActorState, Facing, WallContact};
use crate::foundation::math::{utils, Vec2};
use crate::input::{Actions, InputSet};

/// Physics feedback and current state read before a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementContext {
    /// Current state
    pub state: ActorState,
    /// Ground probe result from the last physics pass
    pub on_ground: bool,
    /// Wall probe results from the last physics pass
    pub wall: WallContact,
    /// Sustain ticks used in the current jump
    pub jump_ticks: u32,
    /// Current velocity
    pub velocity: Vec2,
    /// Current facing
    pub facing: Facing,
}

/// What the transition decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementOutcome {
    /// Next state
    pub state: ActorState,
    /// Velocity after the transition
    pub velocity: Vec2,
    /// Facing after the transition
    pub facing: Facing,
    /// Friction coefficient for the coming physics step
    pub friction: f32,
    /// Sustain ticks used after the transition
    pub jump_ticks: u32,
}

impl MovementOutcome {
    /// Velocity change relative to the context
    pub fn velocity_delta(&self, context: &MovementContext) -> Vec2 {
        self.velocity - context.velocity
    }
}

/// Single horizontal direction held, `None` for neither or both
pub fn horizontal_input(input: &InputSet) -> Option<Facing> {
    match (input.is_held(Actions::LEFT), input.is_held(Actions::RIGHT)) {
        (true, false) => Some(Facing::Left),
        (false, true) => Some(Facing::Right),
        _ => None,
    }
}

/// Compute the next movement state
pub fn transition(context: &MovementContext, input: &InputSet, config: &MovementConfig) -> MovementOutcome {
    if context.on_ground {
        grounded(context, input, config)
    } else {
        airborne(context, input, config)
    }
}

fn grounded(context: &MovementContext, input: &InputSet, config: &MovementConfig) -> MovementOutcome {
    let direction = horizontal_input(input);
    let mut out = MovementOutcome {
        state: ActorState::Standing,
        velocity: context.velocity,
        facing: direction.unwrap_or(context.facing),
        friction: config.high_friction,
        jump_ticks: context.jump_ticks,
    };

    let walk = |velocity: &mut Vec2, facing: Facing| {
        velocity.x = utils::approach(
            velocity.x,
            facing.sign() * config.ground_speed_cap,
            config.ground_acceleration,
        );
    };

    // Ball form holds through ground contact while both inputs stay down
    let keep_spin =
        context.state == ActorState::SpinJump && direction.is_some() && input.is_held(Actions::JUMP);

    if input.just_pressed(Actions::JUMP) {
        out.velocity.y = -config.jump_impulse;
        out.jump_ticks = 0;
        out.friction = config.low_friction;
        out.state = match direction {
            Some(facing) => {
                walk(&mut out.velocity, facing);
                ActorState::SpinJump
            }
            None => ActorState::Jumping,
        };
    } else if let (true, Some(facing)) = (keep_spin, direction) {
        walk(&mut out.velocity, facing);
        out.friction = config.walk_friction;
        out.state = ActorState::SpinJump;
    } else if let Some(facing) = direction {
        walk(&mut out.velocity, facing);
        out.friction = config.walk_friction;
        out.state = ActorState::Walking;
    } else if input.is_held(Actions::CROUCH) {
        out.state = ActorState::Crouching;
    }

    out
}

fn airborne(context: &MovementContext, input: &InputSet, config: &MovementConfig) -> MovementOutcome {
    let direction = horizontal_input(input);
    let mut out = MovementOutcome {
        state: context.state,
        velocity: context.velocity,
        facing: direction.unwrap_or(context.facing),
        friction: config.low_friction,
        jump_ticks: context.jump_ticks,
    };

    let wall_jump = context.state != ActorState::SpinJump && input.just_pressed(Actions::JUMP);
    if let (true, Some(away)) = (wall_jump, context.wall.away()) {
        out.velocity.x = away.sign() * config.wall_jump_impulse;
        out.velocity.y = -config.jump_impulse;
        out.facing = away;
        out.jump_ticks = 0;
        out.state = ActorState::WallJump;
        return out;
    }

    if let Some(facing) = direction {
        out.velocity.x = utils::approach(
            out.velocity.x,
            facing.sign() * config.air_speed_cap,
            config.air_acceleration,
        );
    }

    let rising_jump = matches!(
        context.state,
        ActorState::Jumping | ActorState::SpinJump | ActorState::WallJump
    );
    if rising_jump && input.is_held(Actions::JUMP) && context.jump_ticks < config.jump_sustain_ticks {
        out.velocity.y -= config.jump_sustain_impulse;
        out.jump_ticks = context.jump_ticks + 1;
        return out;
    }

    // Sustain window closed: releasing and re-pressing must not reopen it
    out.jump_ticks = config.jump_sustain_ticks;
    out.state = match context.state {
        ActorState::Jumping => ActorState::JumpEnd,
        ActorState::JumpEnd if out.velocity.y < 0.0 => ActorState::JumpEnd,
        ActorState::WallJump if out.velocity.y < 0.0 => ActorState::WallJump,
        ActorState::SpinJump => ActorState::SpinJump,
        _ => ActorState::Falling,
    };

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(state: ActorState, on_ground: bool) -> MovementContext {
        MovementContext {
            state,
            on_ground,
            wall: WallContact::NONE,
            jump_ticks: 0,
            velocity: Vec2::zeros(),
            facing: Facing::Right,
        }
    }

    fn held(actions: Actions, ticks: u32) -> InputSet {
        let mut input = InputSet::new();
        for _ in 0..=ticks {
            input.advance(actions);
        }
        input
    }

    #[test]
    fn test_idle_ground_stands_with_high_friction() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Walking, true), &InputSet::new(), &config);
        assert_eq!(out.state, ActorState::Standing);
        assert_eq!(out.friction, config.high_friction);
    }

    #[test]
    fn test_crouch_held_without_direction() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Standing, true), &held(Actions::CROUCH, 3), &config);
        assert_eq!(out.state, ActorState::Crouching);

        let out = transition(
            &context(ActorState::Crouching, true),
            &held(Actions::CROUCH | Actions::LEFT, 3),
            &config,
        );
        assert_eq!(out.state, ActorState::Walking);
    }

    #[test]
    fn test_walk_accelerates_in_fixed_steps() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Standing, true), &held(Actions::LEFT, 0), &config);
        assert_eq!(out.state, ActorState::Walking);
        assert_eq!(out.facing, Facing::Left);
        assert_eq!(out.velocity.x, -config.ground_acceleration);

        let mut fast = context(ActorState::Walking, true);
        fast.velocity.x = -390.0;
        let out = transition(&fast, &held(Actions::LEFT, 5), &config);
        assert_eq!(out.velocity.x, -config.ground_speed_cap);
    }

    #[test]
    fn test_jump_kind_depends_on_direction() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Standing, true), &held(Actions::JUMP, 0), &config);
        assert_eq!(out.state, ActorState::Jumping);
        assert_eq!(out.velocity.y, -config.jump_impulse);
        assert_eq!(out.jump_ticks, 0);

        let out = transition(
            &context(ActorState::Walking, true),
            &held(Actions::JUMP | Actions::RIGHT, 0),
            &config,
        );
        assert_eq!(out.state, ActorState::SpinJump);
    }

    #[test]
    fn test_held_jump_does_not_rejump() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Standing, true), &held(Actions::JUMP, 4), &config);
        assert_eq!(out.state, ActorState::Standing);
        assert_eq!(out.velocity.y, 0.0);
    }

    #[test]
    fn test_sustain_then_jump_end() {
        let config = MovementConfig::default();
        let mut rising = context(ActorState::Jumping, false);
        rising.velocity.y = -400.0;

        let out = transition(&rising, &held(Actions::JUMP, 1), &config);
        assert_eq!(out.state, ActorState::Jumping);
        assert_eq!(out.jump_ticks, 1);
        assert_eq!(out.velocity.y, -400.0 - config.jump_sustain_impulse);

        rising.jump_ticks = config.jump_sustain_ticks;
        let out = transition(&rising, &held(Actions::JUMP, 20), &config);
        assert_eq!(out.state, ActorState::JumpEnd);
        assert_eq!(out.velocity.y, -400.0);
    }

    #[test]
    fn test_release_ends_sustain() {
        let config = MovementConfig::default();
        let mut rising = context(ActorState::Jumping, false);
        rising.velocity.y = -300.0;
        rising.jump_ticks = 3;

        let out = transition(&rising, &InputSet::new(), &config);
        assert_eq!(out.state, ActorState::JumpEnd);
        assert_eq!(out.jump_ticks, config.jump_sustain_ticks);
    }

    #[test]
    fn test_jump_end_becomes_falling_at_apex() {
        let config = MovementConfig::default();
        let mut apex = context(ActorState::JumpEnd, false);
        apex.velocity.y = 5.0;
        assert_eq!(transition(&apex, &InputSet::new(), &config).state, ActorState::Falling);
    }

    #[test]
    fn test_walking_off_ledge_falls() {
        let config = MovementConfig::default();
        let out = transition(&context(ActorState::Walking, false), &InputSet::new(), &config);
        assert_eq!(out.state, ActorState::Falling);
    }

    #[test]
    fn test_landing_returns_to_ground_branch() {
        let config = MovementConfig::default();
        for state in [ActorState::Falling, ActorState::JumpEnd, ActorState::WallJump, ActorState::Jumping] {
            let out = transition(&context(state, true), &InputSet::new(), &config);
            assert_eq!(out.state, ActorState::Standing);
        }
    }

    #[test]
    fn test_spin_jump_persists_on_ground_while_inputs_held() {
        let config = MovementConfig::default();
        let landed = context(ActorState::SpinJump, true);

        let out = transition(&landed, &held(Actions::JUMP | Actions::RIGHT, 10), &config);
        assert_eq!(out.state, ActorState::SpinJump);

        let out = transition(&landed, &held(Actions::RIGHT, 10), &config);
        assert_eq!(out.state, ActorState::Walking);

        let out = transition(&landed, &held(Actions::JUMP, 10), &config);
        assert_eq!(out.state, ActorState::Standing);
    }

    #[test]
    fn test_wall_jump_pushes_away() {
        let config = MovementConfig::default();
        let mut sliding = context(ActorState::Falling, false);
        sliding.wall = WallContact { left: false, right: true };
        sliding.velocity = Vec2::new(50.0, 80.0);

        let out = transition(&sliding, &held(Actions::JUMP, 0), &config);
        assert_eq!(out.state, ActorState::WallJump);
        assert_eq!(out.velocity, Vec2::new(-config.wall_jump_impulse, -config.jump_impulse));
        assert_eq!(out.facing, Facing::Left);
    }

    #[test]
    fn test_no_wall_jump_from_spin() {
        let config = MovementConfig::default();
        let mut spinning = context(ActorState::SpinJump, false);
        spinning.wall = WallContact { left: true, right: false };
        spinning.jump_ticks = config.jump_sustain_ticks;

        let out = transition(&spinning, &held(Actions::JUMP, 0), &config);
        assert_eq!(out.state, ActorState::SpinJump);
    }

    #[test]
    fn test_air_control_uses_lower_cap() {
        let config = MovementConfig::default();
        let mut drifting = context(ActorState::Falling, false);
        drifting.velocity.x = 190.0;
        let out = transition(&drifting, &held(Actions::RIGHT, 3), &config);
        assert_eq!(out.velocity.x, config.air_speed_cap);
        assert_eq!(out.friction, config.low_friction);
    }

    #[test]
    fn test_transition_is_deterministic() {
        let config = MovementConfig::default();
        let inputs = [
            held(Actions::LEFT, 2),
            held(Actions::JUMP, 0),
            held(Actions::JUMP | Actions::RIGHT, 7),
            held(Actions::CROUCH, 1),
            InputSet::new(),
        ];
        let states = [
            ActorState::Standing,
            ActorState::Jumping,
            ActorState::SpinJump,
            ActorState::WallJump,
            ActorState::JumpEnd,
            ActorState::Falling,
        ];

        for state in states {
            for on_ground in [false, true] {
                for input in &inputs {
                    let mut ctx = context(state, on_ground);
                    ctx.wall = WallContact { left: true, right: false };
                    ctx.jump_ticks = 4;
                    ctx.velocity = Vec2::new(-120.0, -60.0);

                    let first = transition(&ctx, input, &config);
                    let second = transition(&ctx, input, &config);
                    assert_eq!(first, second);
                    assert_eq!(first.velocity_delta(&ctx), second.velocity_delta(&ctx));
                }
            }
        }
    }
}
