use crate::board::{PADDLE_HEIGHT, PADDLE_WIDTH, Rect, WIN_HEIGHT, WIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    /// Moves vertically, defends the left and right edges.
    One,
    /// Moves horizontally, defends the top and bottom edges.
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    id: PlayerId,
    pub offset: f32,
    pub score: i32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            offset: 0.0,
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Home paddle followed by the opposite-edge paddle. Both track the same
    /// offset along the player's motion axis.
    pub fn rects(&self) -> [Rect; 2] {
        let offset = self.offset as i32;
        match self.id {
            PlayerId::One => [
                Rect::new(0, offset, PADDLE_WIDTH, PADDLE_HEIGHT),
                Rect::new(WIN_WIDTH - PADDLE_WIDTH, offset, PADDLE_WIDTH, PADDLE_HEIGHT),
            ],
            PlayerId::Two => [
                Rect::new(offset, 0, PADDLE_HEIGHT, PADDLE_WIDTH),
                Rect::new(offset, WIN_HEIGHT - PADDLE_WIDTH, PADDLE_HEIGHT, PADDLE_WIDTH),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_one_paddles_are_vertical() {
        let mut player = Player::new(PlayerId::One);
        player.offset = 42.9;

        let [home, side] = player.rects();
        assert_eq!(home, Rect::new(0, 42, 25, 125));
        assert_eq!(side, Rect::new(615, 42, 25, 125));
    }

    #[test]
    fn player_two_paddles_are_horizontal() {
        let mut player = Player::new(PlayerId::Two);
        player.offset = 100.0;

        let [home, side] = player.rects();
        assert_eq!(home, Rect::new(100, 0, 125, 25));
        assert_eq!(side, Rect::new(100, 455, 125, 25));
    }

    #[test]
    fn negative_offset_truncates_toward_zero() {
        let mut player = Player::new(PlayerId::One);
        player.offset = -3.7;
        assert_eq!(player.rects()[0].y, -3);
    }
}
