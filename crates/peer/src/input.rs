use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use netpong::Intents;

/// How long a key counts as held after its last press or repeat when the
/// terminal does not report releases.
pub const HOLD_WINDOW: Duration = Duration::from_millis(120);

/// Turns terminal key events into per-frame intents.
pub struct KeyTracker {
    held: HashMap<KeyCode, Instant>,
    reports_release: bool,
    serve: bool,
    quit: bool,
}

impl KeyTracker {
    pub fn new(reports_release: bool) -> Self {
        Self {
            held: HashMap::new(),
            reports_release,
            serve: false,
            quit: false,
        }
    }

    pub fn handle(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char('r') if key.kind == KeyEventKind::Press => self.serve = true,
                    code => {
                        self.held.insert(code, now);
                    }
                }
            }
            KeyEventKind::Release => {
                self.held.remove(&key.code);
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Intents for the frame ending at `now`. A serve is reported once per
    /// key press.
    pub fn intents(&mut self, now: Instant) -> Intents {
        if !self.reports_release {
            self.held
                .retain(|_, pressed| now.saturating_duration_since(*pressed) < HOLD_WINDOW);
        }

        let mut intents = Intents::empty();
        for code in self.held.keys() {
            intents |= match code {
                KeyCode::Up => Intents::P1_UP,
                KeyCode::Down => Intents::P1_DOWN,
                KeyCode::Char('a') => Intents::P2_LEFT,
                KeyCode::Char('d') => Intents::P2_RIGHT,
                _ => Intents::empty(),
            };
        }
        if std::mem::take(&mut self.serve) {
            intents |= Intents::SERVE;
        }
        intents
    }
}
