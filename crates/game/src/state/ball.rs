use glam::Vec2;

use crate::board::{BALL_SIZE, Rect, WIN_HEIGHT, WIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Set on first paddle contact, cleared once the ball overlaps no paddle.
    pub colliding: bool,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Self::center_position(),
            vel: Vec2::ZERO,
            colliding: false,
        }
    }
}

impl Ball {
    pub fn center_position() -> Vec2 {
        Vec2::new(
            (WIN_WIDTH / 2 - BALL_SIZE / 2) as f32,
            (WIN_HEIGHT / 2 - BALL_SIZE / 2) as f32,
        )
    }

    /// Back to the centre of the board, at rest. The latch is left alone.
    pub fn reset(&mut self) {
        self.pos = Self::center_position();
        self.vel = Vec2::ZERO;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x as i32, self.pos.y as i32, BALL_SIZE, BALL_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(BALL_SIZE as f32 / 2.0)
    }
}
