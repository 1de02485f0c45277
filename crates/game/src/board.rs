pub const WIN_WIDTH: i32 = 640;
pub const WIN_HEIGHT: i32 = 480;
pub const PADDLE_HEIGHT: i32 = 125;
pub const PADDLE_WIDTH: i32 = 25;
pub const BALL_SIZE: i32 = 20;

/// Paddle speed in pixels per second.
pub const PADDLE_SPEED: f32 = 200.0;
/// Ball speed in pixels per second, both after a bounce and on serve.
pub const BALL_SPEED: f32 = 400.0;

/// Integer axis-aligned rectangle in board pixels, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect, and an empty rectangle intersects nothing. Edges saturate
    /// at the `i32` range, so far-off rectangles never wrap around.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let min_x = self.x.max(other.x);
        let max_x = self.right().min(other.right());
        if max_x <= min_x {
            return false;
        }

        let min_y = self.y.max(other.y);
        let max_y = self.bottom().min(other.bottom());
        max_y > min_y
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }
}
