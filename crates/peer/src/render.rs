use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Rectangle};
use ratatui::widgets::{Block, Borders, Paragraph};

use netpong::board::{WIN_HEIGHT, WIN_WIDTH};
use netpong::{GameState, NetworkStats, PlayerId, Rect, Role};

/// Everything one frame draws.
pub struct View<'a> {
    pub role: Role,
    pub state: &'a GameState,
    pub stats: NetworkStats,
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(status_line(view)), chunks[0]);
    render_board(frame, chunks[1], view.state);

    let help = Paragraph::new("Up/Down: player 1  a/d: player 2  r: serve  q: quit").style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    );
    frame.render_widget(help, chunks[2]);
}

fn status_line(view: &View) -> Line<'static> {
    let (p1, p2) = view.state.score();
    let mut spans = vec![
        Span::styled(
            format!(" {} : {} ", p1, p2),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {:?}  t={}ms", view.role, view.state.time),
            Style::default().fg(Color::Gray),
        ),
    ];

    if view.role != Role::Local {
        let net = &view.stats;
        spans.push(Span::styled(
            format!(
                "  {} sent / {} recv / {} dropped",
                net.packets_sent, net.packets_received, net.packets_malformed
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    Line::from(spans)
}

fn render_board(frame: &mut Frame, area: ratatui::layout::Rect, state: &GameState) {
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, WIN_WIDTH as f64])
        .y_bounds([0.0, WIN_HEIGHT as f64])
        .paint(|ctx| {
            for rect in state.player(PlayerId::One).rects() {
                ctx.draw(&to_canvas(rect, Color::Green));
            }
            for rect in state.player(PlayerId::Two).rects() {
                ctx.draw(&to_canvas(rect, Color::Yellow));
            }
            ctx.draw(&to_canvas(state.ball.rect(), Color::White));
        });

    frame.render_widget(canvas, area);
}

/// Board coordinates grow downward, canvas coordinates grow upward.
fn to_canvas(rect: Rect, color: Color) -> Rectangle {
    Rectangle {
        x: rect.x as f64,
        y: WIN_HEIGHT as f64 - rect.y as f64 - rect.h as f64,
        width: rect.w as f64,
        height: rect.h as f64,
        color,
    }
}
