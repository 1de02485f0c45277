use super::{Ball, Player, PlayerId};

/// Everything needed to render or resume a match. Exchanged wholesale in
/// update packets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    /// Session tick (milliseconds since session start) this state is valid for.
    pub time: u32,
    pub players: [Player; 2],
    pub ball: Ball,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            time: 0,
            players: [Player::new(PlayerId::One), Player::new(PlayerId::Two)],
            ball: Ball::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn score(&self) -> (i32, i32) {
        (self.players[0].score, self.players[1].score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn initial_state() {
        let state = GameState::new();
        assert_eq!(state.time, 0);
        assert_eq!(state.score(), (0, 0));
        assert_eq!(state.player(PlayerId::One).offset, 0.0);
        assert_eq!(state.player(PlayerId::Two).id(), PlayerId::Two);
        assert_eq!(state.ball.pos, Vec2::new(310.0, 230.0));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(!state.ball.colliding);
    }
}
