use bitflags::bitflags;

use crate::board::PADDLE_SPEED;
use crate::net::Role;
use crate::simulation::Command;
use crate::state::PlayerId;

bitflags! {
    /// Already-decoded player intents for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Intents: u8 {
        const P1_UP = 1 << 0;
        const P1_DOWN = 1 << 1;
        const P2_LEFT = 1 << 2;
        const P2_RIGHT = 1 << 3;
        /// Re-centre and launch the ball.
        const SERVE = 1 << 4;
    }
}

/// Which paddles this process drives, and who serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub player_one: bool,
    pub player_two: bool,
    pub server: PlayerId,
}

impl Controls {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Local => Self {
                player_one: true,
                player_two: true,
                server: PlayerId::One,
            },
            Role::Host => Self {
                player_one: true,
                player_two: false,
                server: PlayerId::One,
            },
            Role::Join => Self {
                player_one: false,
                player_two: true,
                server: PlayerId::Two,
            },
        }
    }
}

/// Serves always go toward the low edge of the server's axis.
pub const SERVE_DIRECTION: i32 = -1;

impl Intents {
    /// Commands for the held intents, stamped with `timestamp`. Paddles move
    /// `PADDLE_SPEED` pixels per second over `delta_ms`.
    pub fn commands(self, controls: Controls, delta_ms: u32, timestamp: u32) -> Vec<Command> {
        let step = PADDLE_SPEED * (delta_ms as f32 / 1000.0);
        let mut commands = Vec::new();

        if controls.player_one {
            if self.contains(Intents::P1_UP) {
                commands.push(Command::movement(PlayerId::One, -step, timestamp));
            }
            if self.contains(Intents::P1_DOWN) {
                commands.push(Command::movement(PlayerId::One, step, timestamp));
            }
        }

        if controls.player_two {
            if self.contains(Intents::P2_LEFT) {
                commands.push(Command::movement(PlayerId::Two, -step, timestamp));
            }
            if self.contains(Intents::P2_RIGHT) {
                commands.push(Command::movement(PlayerId::Two, step, timestamp));
            }
        }

        if self.contains(Intents::SERVE) {
            commands.push(Command::serve(controls.server, SERVE_DIRECTION, timestamp));
        }

        commands
    }
}
