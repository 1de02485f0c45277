use std::time::Instant;

use crate::config::SessionConfig;
use crate::input::{Controls, Intents};
use crate::net::{NetEvent, Packet, Role};
use crate::simulation::{Command, CommandBuffer, advance};
use crate::state::GameState;

/// Milliseconds since the session started, as the simulation's tick counter.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// Main-loop state of one process. `frame` is the only place game state and
/// the command buffer are mutated; the receive thread hands its events in
/// through `inbound`.
pub struct Peer {
    role: Role,
    controls: Controls,
    state: GameState,
    commands: CommandBuffer,
    sub_step_ms: u32,
    last_frame: u32,
    dropped_commands: u64,
}

impl Peer {
    pub fn new(role: Role, config: &SessionConfig) -> Self {
        Self {
            role,
            controls: Controls::for_role(role),
            state: GameState::new(),
            commands: CommandBuffer::new(config.command_capacity),
            sub_step_ms: config.sub_step_ms,
            last_frame: 0,
            dropped_commands: 0,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Commands lost to a full buffer since the session started.
    pub fn dropped_commands(&self) -> u64 {
        self.dropped_commands
    }

    /// Runs one frame ending at session tick `now` and returns the packet to
    /// send to the peer, if the role sends one.
    ///
    /// Local input is stamped with the first tick of the window being
    /// simulated. Remote commands keep their sender's stamp and only take
    /// effect if it lands inside this frame's window.
    pub fn frame<I>(&mut self, now: u32, intents: Intents, inbound: I) -> Option<Packet>
    where
        I: IntoIterator<Item = NetEvent>,
    {
        let delta = now.wrapping_sub(self.last_frame);

        for command in intents.commands(self.controls, delta, self.last_frame) {
            self.push(command);
        }

        for event in inbound {
            match (self.role, event) {
                (Role::Host, NetEvent::Commands(commands)) => {
                    for command in commands {
                        self.push(command);
                    }
                }
                (Role::Join, NetEvent::Update(state)) => self.state = state,
                (role, event) => log::debug!("{:?} ignoring {:?}", role, event),
            }
        }

        let outbound = match self.role {
            Role::Local => {
                self.step_to(now);
                None
            }
            Role::Host => {
                self.step_to(now);
                Some(Packet::Update(self.state))
            }
            Role::Join => {
                let packet = Packet::Cmd(self.commands.as_slice().to_vec());
                // Replay from the host's tick up to ours; if the host is
                // ahead of our clock, just run one frame's worth.
                let start = self.state.time;
                let duration = if start < now { now - start } else { delta };
                advance(
                    &mut self.state,
                    start,
                    duration,
                    self.sub_step_ms,
                    self.commands.as_slice(),
                );
                self.state.time = now;
                Some(packet)
            }
        };

        self.commands.clear();
        self.last_frame = now;
        outbound
    }

    fn step_to(&mut self, now: u32) {
        let start = self.state.time;
        advance(
            &mut self.state,
            start,
            now.wrapping_sub(start),
            self.sub_step_ms,
            self.commands.as_slice(),
        );
        self.state.time = now;
    }

    fn push(&mut self, command: Command) {
        if let Err(e) = self.commands.append(command) {
            self.dropped_commands += 1;
            log::debug!("dropping {:?}: {}", command.kind(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerId;

    fn peer(role: Role) -> Peer {
        Peer::new(role, &SessionConfig::default())
    }

    #[test]
    fn local_applies_own_input() {
        let mut peer = peer(Role::Local);
        assert!(peer.frame(0, Intents::empty(), []).is_none());

        let out = peer.frame(100, Intents::P1_DOWN | Intents::P2_LEFT, []);

        assert!(out.is_none());
        assert_eq!(peer.state().player(PlayerId::One).offset, 20.0);
        assert_eq!(peer.state().player(PlayerId::Two).offset, -20.0);
        assert_eq!(peer.state().time, 100);
    }

    #[test]
    fn host_merges_remote_commands_inside_window() {
        let mut peer = peer(Role::Host);
        peer.frame(0, Intents::empty(), []);

        let inbound = [NetEvent::Commands(vec![
            Command::movement(PlayerId::Two, 5.0, 10),
            Command::movement(PlayerId::Two, 100.0, 60),
        ])];
        let out = peer.frame(50, Intents::empty(), inbound);

        let Some(Packet::Update(state)) = out else {
            panic!("host should send an update");
        };
        assert_eq!(state.time, 50);
        assert_eq!(state.player(PlayerId::Two).offset, 5.0);
        assert_eq!(peer.state(), &state);
    }

    #[test]
    fn host_ignores_updates() {
        let mut peer = peer(Role::Host);
        let mut foreign = GameState::new();
        foreign.player_mut(PlayerId::One).score = 9;

        peer.frame(16, Intents::empty(), [NetEvent::Update(foreign)]);

        assert_eq!(peer.state().score(), (0, 0));
    }

    #[test]
    fn join_adopts_update_and_sends_commands() {
        let mut peer = peer(Role::Join);
        peer.frame(0, Intents::empty(), []);

        let mut host_state = GameState::new();
        host_state.time = 20;
        host_state.player_mut(PlayerId::One).offset = 33.0;
        host_state.player_mut(PlayerId::One).score = 2;

        let out = peer.frame(40, Intents::P2_RIGHT, [NetEvent::Update(host_state)]);

        assert_eq!(
            out,
            Some(Packet::Cmd(vec![Command::movement(PlayerId::Two, 8.0, 0)]))
        );
        assert_eq!(peer.state().player(PlayerId::One).offset, 33.0);
        assert_eq!(peer.state().score(), (2, 0));
        assert_eq!(peer.state().time, 40);
    }

    #[test]
    fn join_without_input_still_sends_empty_batch() {
        let mut peer = peer(Role::Join);
        assert_eq!(
            peer.frame(16, Intents::empty(), []),
            Some(Packet::Cmd(Vec::new()))
        );
    }

    #[test]
    fn join_ahead_of_clock_runs_one_frame() {
        let mut peer = peer(Role::Join);
        peer.frame(0, Intents::empty(), []);

        let mut host_state = GameState::new();
        host_state.time = 500;
        host_state.ball.vel = glam::Vec2::new(100.0, 0.0);

        peer.frame(20, Intents::empty(), [NetEvent::Update(host_state)]);

        // Ticks 500..520 contain two sub-steps of 10ms.
        assert!((peer.state().ball.pos.x - 312.0).abs() < 1e-4);
        assert_eq!(peer.state().time, 20);
    }

    #[test]
    fn host_survives_extreme_remote_offsets() {
        let wire = Packet::Cmd(vec![
            Command::movement(PlayerId::Two, 3.0e9, 0),
            Command::movement(PlayerId::Two, f32::MAX, 5),
            Command::movement(PlayerId::One, -f32::MAX, 5),
        ])
        .encode()
        .unwrap();
        let Packet::Cmd(commands) = Packet::decode(&wire).unwrap() else {
            panic!("expected a command packet");
        };

        let mut peer = peer(Role::Host);
        peer.state.ball.vel = glam::Vec2::new(-400.0, 0.0);
        let out = peer.frame(20, Intents::empty(), [NetEvent::Commands(commands)]);

        assert!(matches!(out, Some(Packet::Update(_))));
        assert_eq!(peer.state().player(PlayerId::Two).rects()[0].x, i32::MAX);
        assert_eq!(peer.state().player(PlayerId::One).rects()[0].y, i32::MIN);
        assert_eq!(peer.state().score(), (0, 0));
    }

    #[test]
    fn join_score_saturates_on_replay() {
        let mut peer = peer(Role::Join);
        peer.frame(0, Intents::empty(), []);

        let mut host_state = GameState::new();
        host_state.player_mut(PlayerId::Two).score = i32::MAX;
        host_state.ball.pos = glam::Vec2::new(-25.0, 100.0);
        host_state.ball.vel = glam::Vec2::new(-400.0, 0.0);

        peer.frame(20, Intents::empty(), [NetEvent::Update(host_state)]);

        assert_eq!(peer.state().score(), (0, i32::MAX));
        assert_eq!(peer.state().ball.pos, glam::Vec2::new(310.0, 230.0));
    }

    #[test]
    fn full_buffer_drops_commands() {
        let config = SessionConfig {
            command_capacity: 1,
            ..Default::default()
        };
        let mut peer = Peer::new(Role::Host, &config);

        let inbound = [NetEvent::Commands(vec![
            Command::movement(PlayerId::Two, 1.0, 0),
            Command::movement(PlayerId::Two, 1.0, 0),
        ])];
        peer.frame(10, Intents::empty(), inbound);

        assert_eq!(peer.dropped_commands(), 1);
        assert_eq!(peer.state().player(PlayerId::Two).offset, 1.0);
    }
}
