mod ball;
mod game;
mod player;

pub use ball::Ball;
pub use game::GameState;
pub use player::{Player, PlayerId};
