use glam::Vec2;

use super::collision::resolve_ball;
use super::command::{Action, Command};
use crate::board::BALL_SPEED;
use crate::state::{GameState, PlayerId};

/// Ball physics and collision interval, in milliseconds.
pub const DEFAULT_SUB_STEP_MS: u32 = 10;

/// Replays `duration` milliseconds starting at tick `start`.
///
/// Commands are matched against each millisecond exactly: a command whose
/// timestamp falls outside `[start, start + duration)` is never applied,
/// and nothing is carried over to the next call. The ball only moves on
/// ticks that are a multiple of `sub_step_ms`, so splitting a window in two
/// gives the same result as replaying it in one call. A zero `sub_step_ms`
/// freezes the ball.
///
/// `state.time` is not touched; the caller owns the session clock.
pub fn advance(
    state: &mut GameState,
    start: u32,
    duration: u32,
    sub_step_ms: u32,
    commands: &[Command],
) {
    let dt = sub_step_ms as f32 / 1000.0;

    for i in 0..duration {
        let tick = start.wrapping_add(i);

        for command in commands.iter().filter(|c| c.timestamp == tick) {
            apply_command(state, command);
        }

        if tick.checked_rem(sub_step_ms) == Some(0) {
            state.ball.pos += state.ball.vel * dt;
            resolve_ball(state);
        }
    }
}

pub fn apply_command(state: &mut GameState, command: &Command) {
    match command.action {
        Action::Move(offset) => {
            state.player_mut(command.player).offset += offset;
        }
        Action::Serve(direction) => {
            let speed = direction.signum() as f32 * BALL_SPEED;
            state.ball.reset();
            state.ball.vel = match command.player {
                PlayerId::One => Vec2::new(speed, 0.0),
                PlayerId::Two => Vec2::new(0.0, speed),
            };
        }
    }
}
