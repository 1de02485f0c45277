use crate::board::{BALL_SIZE, BALL_SPEED, Rect, WIN_HEIGHT, WIN_WIDTH};
use crate::state::{GameState, PlayerId};

/// Order in which paddle rectangles are tested against the ball. When the
/// ball overlaps several at once, the last one in this order wins.
pub const CONTACT_ORDER: [(PlayerId, usize); 4] = [
    (PlayerId::One, 0),
    (PlayerId::Two, 0),
    (PlayerId::One, 1),
    (PlayerId::Two, 1),
];

/// Scoring and paddle bounces for the ball's current position.
pub fn resolve_ball(state: &mut GameState) {
    if let Some(scorer) = scoring_player(state) {
        let player = state.player_mut(scorer);
        player.score = player.score.saturating_add(1);
        state.ball.reset();
        log::debug!("point for {:?}, score {:?}", scorer, state.score());
        return;
    }

    let ball_rect = state.ball.rect();
    let contact = contact_paddle(state, &ball_rect);

    match contact {
        Some(paddle) if !state.ball.colliding => {
            let away = state.ball.center() - paddle.center();
            if away != glam::Vec2::ZERO {
                state.ball.vel = away.normalize() * BALL_SPEED;
            }
            state.ball.colliding = true;
        }
        Some(_) => {}
        None => state.ball.colliding = false,
    }
}

fn scoring_player(state: &GameState) -> Option<PlayerId> {
    let pos = state.ball.pos;
    let size = BALL_SIZE as f32;

    if pos.x + size < 0.0 || pos.x > WIN_WIDTH as f32 {
        return Some(PlayerId::Two);
    }
    if pos.y + size < 0.0 || pos.y > WIN_HEIGHT as f32 {
        return Some(PlayerId::One);
    }
    None
}

fn contact_paddle(state: &GameState, ball_rect: &Rect) -> Option<Rect> {
    CONTACT_ORDER
        .iter()
        .map(|&(id, index)| state.player(id).rects()[index])
        .filter(|paddle| ball_rect.intersects(paddle))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn state_with_ball(pos: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new();
        state.ball.pos = pos;
        state.ball.vel = vel;
        state
    }

    #[test]
    fn leaving_left_edge_scores_for_player_two() {
        let mut state = state_with_ball(Vec2::new(-25.0, 100.0), Vec2::new(-400.0, 0.0));

        resolve_ball(&mut state);

        assert_eq!(state.score(), (0, 1));
        assert_eq!(state.ball.pos, Vec2::new(310.0, 230.0));
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let mut state = state_with_ball(Vec2::new(-25.0, 100.0), Vec2::ZERO);
        state.player_mut(PlayerId::Two).score = i32::MAX;

        resolve_ball(&mut state);

        assert_eq!(state.score(), (0, i32::MAX));
        assert_eq!(state.ball.pos, Vec2::new(310.0, 230.0));
    }

    #[test]
    fn ball_still_touching_left_edge_does_not_score() {
        let mut state = state_with_ball(Vec2::new(-5.0, 240.0), Vec2::ZERO);
        state.player_mut(PlayerId::One).offset = -400.0;
        resolve_ball(&mut state);
        assert_eq!(state.score(), (0, 0));
    }

    #[test]
    fn leaving_right_edge_scores_for_player_two() {
        let mut state = state_with_ball(Vec2::new(641.0, 100.0), Vec2::ZERO);
        resolve_ball(&mut state);
        assert_eq!(state.score(), (0, 1));
    }

    #[test]
    fn leaving_top_or_bottom_scores_for_player_one() {
        let mut state = state_with_ball(Vec2::new(300.0, -21.0), Vec2::ZERO);
        resolve_ball(&mut state);
        assert_eq!(state.score(), (1, 0));

        let mut state = state_with_ball(Vec2::new(300.0, 481.0), Vec2::ZERO);
        resolve_ball(&mut state);
        assert_eq!(state.score(), (1, 0));
    }

    #[test]
    fn paddle_contact_sets_velocity_to_ball_speed() {
        // Player one's home paddle spans x 0..25, y 0..125.
        let mut state = state_with_ball(Vec2::new(15.0, 40.0), Vec2::new(-400.0, 0.0));

        resolve_ball(&mut state);

        let paddle_center = Vec2::new(12.5, 62.5);
        let expected_dir = (state.ball.center() - paddle_center).normalize();
        assert!((state.ball.vel.length() - BALL_SPEED).abs() < 1e-3);
        assert!((state.ball.vel.normalize() - expected_dir).length() < 1e-5);
        assert!(state.ball.colliding);
    }

    #[test]
    fn latch_blocks_repeat_bounce() {
        let mut state = state_with_ball(Vec2::new(15.0, 40.0), Vec2::ZERO);
        state.ball.colliding = true;
        let before = Vec2::new(-123.0, 4.0);
        state.ball.vel = before;

        resolve_ball(&mut state);

        assert_eq!(state.ball.vel, before);
        assert!(state.ball.colliding);
    }

    #[test]
    fn latch_clears_once_clear_of_paddles() {
        let mut state = state_with_ball(Vec2::new(300.0, 200.0), Vec2::ZERO);
        state.ball.colliding = true;
        resolve_ball(&mut state);
        assert!(!state.ball.colliding);
    }

    #[test]
    fn coincident_centres_keep_velocity_but_latch() {
        // Ball centred exactly on player one's home paddle centre.
        let mut state = state_with_ball(Vec2::new(2.5, 52.5), Vec2::new(1.0, 2.0));
        resolve_ball(&mut state);
        assert_eq!(state.ball.vel, Vec2::new(1.0, 2.0));
        assert!(state.ball.colliding);
    }

    #[test]
    fn simultaneous_overlap_uses_last_rect_in_order() {
        // Top-left corner: player one's home paddle and player two's home
        // paddle both overlap the ball. Player two's home comes later.
        let mut state = state_with_ball(Vec2::new(10.0, 10.0), Vec2::ZERO);

        resolve_ball(&mut state);

        let p2_home = state.player(PlayerId::Two).rects()[0];
        let expected = (state.ball.center() - p2_home.center()).normalize() * BALL_SPEED;
        assert!((state.ball.vel - expected).length() < 1e-3);
    }
}
