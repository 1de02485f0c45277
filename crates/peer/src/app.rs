use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use netpong::{Intents, NetEvent, Peer, Role, Session, SessionClock, SessionConfig, SessionError};

use crate::input::KeyTracker;
use crate::render::{self, View};

type Inbound = Option<(JoinHandle<()>, Receiver<NetEvent>)>;

pub struct App {
    session: Session,
    peer: Peer,
    config: SessionConfig,
    running: Arc<AtomicBool>,
}

impl App {
    pub fn new(session: Session, config: SessionConfig, running: Arc<AtomicBool>) -> Self {
        let peer = Peer::new(session.role(), &config);
        Self {
            session,
            peer,
            config,
            running,
        }
    }

    pub fn waiting_message(&self) -> String {
        match (self.session.role(), self.session.local_addr(), self.session.peer()) {
            (Role::Host, Some(addr), _) => format!("Hosting on {}, waiting for a peer...", addr),
            (Role::Join, _, Some(peer)) => format!("Joining {}...", peer),
            _ => "Starting local game".to_string(),
        }
    }

    /// Blocks until the handshake finishes.
    pub fn connect(&mut self) -> Result<(), SessionError> {
        log::info!("{}", self.waiting_message());
        self.session.wait_for_game(&self.running)
    }

    pub fn run_headless(&mut self, duration: Option<Duration>) -> Result<()> {
        let inbound = self.start_receiver()?;
        let clock = SessionClock::start();
        let started = Instant::now();
        let interval = self.config.frame_interval();
        let mut next_frame = Instant::now();
        let mut score = self.peer.state().score();

        log::info!("{:?} session running", self.session.role());

        while self.running.load(Ordering::SeqCst) {
            if duration.is_some_and(|d| started.elapsed() >= d) {
                break;
            }

            self.frame(&clock, Intents::empty(), &inbound);

            let current = self.peer.state().score();
            if current != score {
                log::info!("score {}:{}", current.0, current.1);
                score = current;
            }

            next_frame = pace(next_frame, interval);
        }

        self.shutdown(inbound);
        Ok(())
    }

    pub fn run_with_tui(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_release {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.tui_loop(&mut terminal, reports_release);

        if reports_release {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn tui_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        reports_release: bool,
    ) -> Result<()> {
        let inbound = self.start_receiver()?;
        let result = self.play(terminal, reports_release, &inbound);
        self.shutdown(inbound);
        result
    }

    fn play(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        reports_release: bool,
        inbound: &Inbound,
    ) -> Result<()> {
        let clock = SessionClock::start();
        let interval = self.config.frame_interval();
        let mut keys = KeyTracker::new(reports_release);
        let mut next_frame = Instant::now() + interval;

        while self.running.load(Ordering::SeqCst) {
            // Collect key events until the next frame is due.
            loop {
                let wait = next_frame.saturating_duration_since(Instant::now());
                if !event::poll(wait)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    keys.handle(key, Instant::now());
                }
            }
            next_frame += interval;

            if keys.quit_requested() {
                self.running.store(false, Ordering::SeqCst);
                break;
            }

            let intents = keys.intents(Instant::now());
            self.frame(&clock, intents, inbound);

            let view = View {
                role: self.session.role(),
                state: self.peer.state(),
                stats: self.session.stats(),
            };
            terminal.draw(|frame| render::render(frame, &view))?;
        }

        Ok(())
    }

    fn start_receiver(&self) -> Result<Inbound, SessionError> {
        match self.session.role() {
            Role::Local => Ok(None),
            Role::Host | Role::Join => self
                .session
                .spawn_receiver(Arc::clone(&self.running))
                .map(Some),
        }
    }

    fn frame(&mut self, clock: &SessionClock, intents: Intents, inbound: &Inbound) {
        let events: Vec<NetEvent> = match inbound {
            Some((_, rx)) => rx.try_iter().collect(),
            None => Vec::new(),
        };

        if let Some(packet) = self.peer.frame(clock.now_ms(), intents, events) {
            if let Err(e) = self.session.send(&packet) {
                log::warn!("{}", e);
            }
        }
    }

    fn shutdown(&mut self, inbound: Inbound) {
        self.running.store(false, Ordering::SeqCst);

        if let Some((handle, _)) = inbound {
            if handle.join().is_err() {
                log::error!("receive thread panicked");
            }
        }

        let stats = self.session.stats();
        log::info!(
            "session over: score {:?}, {} packets sent, {} received, {} malformed, {} commands dropped",
            self.peer.state().score(),
            stats.packets_sent,
            stats.packets_received,
            stats.packets_malformed,
            self.peer.dropped_commands()
        );
    }
}

/// Sleeps until `next_frame` and returns the deadline after it. A loop that
/// has fallen behind restarts from now instead of bursting.
fn pace(next_frame: Instant, interval: Duration) -> Instant {
    let now = Instant::now();
    if next_frame > now {
        thread::sleep(next_frame - now);
        next_frame + interval
    } else {
        now + interval
    }
}
