//! Fixed-layout wire format.
//!
//! Every field is four bytes in host byte order, written back to back with no
//! padding and no version field. Peers on architectures with different
//! endianness cannot talk to each other.

use glam::Vec2;

use crate::board::Rect;
use crate::simulation::{Action, Command, CommandKind};
use crate::state::{Ball, GameState, Player, PlayerId};

pub const DEFAULT_PORT: u16 = 1200;
/// Receive buffer size.
pub const MAX_PACKET_SIZE: usize = 0xFFFF;
/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM_PAYLOAD: usize = 65_507;

pub const CONTROL_PACKET_SIZE: usize = 4;
pub const COMMAND_SIZE: usize = 12;
pub const COMMAND_HEADER_SIZE: usize = 8;
const RECT_SIZE: usize = 16;
const PLAYER_SIZE: usize = 2 * RECT_SIZE + 8;
const BALL_SIZE: usize = 16 + RECT_SIZE + 4;
pub const GAME_STATE_SIZE: usize = 4 + 2 * PLAYER_SIZE + BALL_SIZE;
pub const UPDATE_PACKET_SIZE: usize = 4 + GAME_STATE_SIZE;
pub const MAX_COMMANDS_PER_PACKET: usize =
    (MAX_DATAGRAM_PAYLOAD - COMMAND_HEADER_SIZE) / COMMAND_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PacketKind {
    Syn = 1,
    Ack = 2,
    SynAck = 3,
    Update = 4,
    Cmd = 5,
}

impl TryFrom<u32> for PacketKind {
    type Error = ProtocolError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PacketKind::Syn),
            2 => Ok(PacketKind::Ack),
            3 => Ok(PacketKind::SynAck),
            4 => Ok(PacketKind::Update),
            5 => Ok(PacketKind::Cmd),
            other => Err(ProtocolError::UnknownPacketType(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Syn,
    Ack,
    SynAck,
    Update(GameState),
    Cmd(Vec<Command>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("{kind:?} packet truncated: need {expected} bytes, got {actual}")]
    Truncated {
        kind: Option<PacketKind>,
        expected: usize,
        actual: usize,
    },
    #[error("unknown packet type {0}")]
    UnknownPacketType(u32),
    #[error("unknown command kind {0}")]
    UnknownCommandKind(u32),
    #[error("{0} commands exceed the per-packet limit of {max}", max = MAX_COMMANDS_PER_PACKET)]
    TooManyCommands(usize),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Syn => PacketKind::Syn,
            Packet::Ack => PacketKind::Ack,
            Packet::SynAck => PacketKind::SynAck,
            Packet::Update(_) => PacketKind::Update,
            Packet::Cmd(_) => PacketKind::Cmd,
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Packet::Syn | Packet::Ack | Packet::SynAck => CONTROL_PACKET_SIZE,
            Packet::Update(_) => UPDATE_PACKET_SIZE,
            Packet::Cmd(commands) => COMMAND_HEADER_SIZE + commands.len() * COMMAND_SIZE,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        if let Packet::Cmd(commands) = self {
            if commands.len() > MAX_COMMANDS_PER_PACKET {
                return Err(ProtocolError::TooManyCommands(commands.len()));
            }
        }

        let mut bytes = Vec::with_capacity(self.encoded_len());
        write_u32(&mut bytes, self.kind() as u32);
        match self {
            Packet::Syn | Packet::Ack | Packet::SynAck => {}
            Packet::Update(state) => write_game_state(&mut bytes, state),
            Packet::Cmd(commands) => write_commands(&mut bytes, commands),
        }
        Ok(bytes)
    }

    /// Bytes past the end of the declared layout are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut data = data;
        if data.len() < CONTROL_PACKET_SIZE {
            return Err(ProtocolError::Truncated {
                kind: None,
                expected: CONTROL_PACKET_SIZE,
                actual: data.len(),
            });
        }

        let kind = PacketKind::try_from(read_u32(&mut data))?;
        match kind {
            PacketKind::Syn => Ok(Packet::Syn),
            PacketKind::Ack => Ok(Packet::Ack),
            PacketKind::SynAck => Ok(Packet::SynAck),
            PacketKind::Update => {
                ensure_len(kind, &data, GAME_STATE_SIZE)?;
                Ok(Packet::Update(read_game_state(&mut data)))
            }
            PacketKind::Cmd => decode_commands(&mut data).map(Packet::Cmd),
        }
    }
}

/// `[u32 count][command...]` without the packet tag.
pub fn encode_commands(commands: &[Command]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4 + commands.len() * COMMAND_SIZE);
    write_commands(&mut bytes, commands);
    bytes
}

fn write_commands(bytes: &mut Vec<u8>, commands: &[Command]) {
    write_u32(bytes, commands.len() as u32);
    for command in commands {
        write_u32(bytes, command.kind() as u32);
        write_u32(bytes, command.timestamp);
        match command.action {
            Action::Move(offset) => write_f32(bytes, offset),
            Action::Serve(direction) => write_i32(bytes, direction),
        }
    }
}

fn decode_commands(data: &mut &[u8]) -> Result<Vec<Command>, ProtocolError> {
    ensure_len(PacketKind::Cmd, data, 4)?;
    let count = read_u32(data) as usize;
    if count > MAX_COMMANDS_PER_PACKET {
        return Err(ProtocolError::TooManyCommands(count));
    }
    ensure_len(PacketKind::Cmd, data, count * COMMAND_SIZE)?;

    let mut commands = Vec::with_capacity(count);
    for _ in 0..count {
        let raw_kind = read_u32(data);
        let kind =
            CommandKind::try_from(raw_kind).map_err(ProtocolError::UnknownCommandKind)?;
        let timestamp = read_u32(data);
        let action = match kind {
            CommandKind::Player1Move | CommandKind::Player2Move => Action::Move(read_f32(data)),
            CommandKind::Player1Serve | CommandKind::Player2Serve => {
                Action::Serve(read_i32(data))
            }
        };
        commands.push(Command {
            player: kind.player(),
            action,
            timestamp,
        });
    }
    Ok(commands)
}

fn write_game_state(bytes: &mut Vec<u8>, state: &GameState) {
    write_u32(bytes, state.time);
    for player in &state.players {
        for rect in player.rects() {
            write_rect(bytes, &rect);
        }
        write_f32(bytes, player.offset);
        write_i32(bytes, player.score);
    }

    let ball = &state.ball;
    write_f32(bytes, ball.pos.x);
    write_f32(bytes, ball.pos.y);
    write_f32(bytes, ball.vel.x);
    write_f32(bytes, ball.vel.y);
    write_rect(bytes, &ball.rect());
    write_i32(bytes, ball.colliding as i32);
}

// Rectangles on the wire are derived data; they are skipped on the way in
// and recomputed from offsets and positions.
fn read_game_state(data: &mut &[u8]) -> GameState {
    let time = read_u32(data);

    let mut players = PlayerId::ALL.map(Player::new);
    for player in &mut players {
        skip(data, 2 * RECT_SIZE);
        player.offset = read_f32(data);
        player.score = read_i32(data);
    }

    let pos = Vec2::new(read_f32(data), read_f32(data));
    let vel = Vec2::new(read_f32(data), read_f32(data));
    skip(data, RECT_SIZE);
    let colliding = read_i32(data) != 0;

    GameState {
        time,
        players,
        ball: Ball {
            pos,
            vel,
            colliding,
        },
    }
}

fn ensure_len(kind: PacketKind, data: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if data.len() < expected {
        return Err(ProtocolError::Truncated {
            kind: Some(kind),
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

fn write_u32(bytes: &mut Vec<u8>, value: u32) {
    bytes.extend_from_slice(&value.to_ne_bytes());
}

fn write_i32(bytes: &mut Vec<u8>, value: i32) {
    bytes.extend_from_slice(&value.to_ne_bytes());
}

fn write_f32(bytes: &mut Vec<u8>, value: f32) {
    bytes.extend_from_slice(&value.to_ne_bytes());
}

fn write_rect(bytes: &mut Vec<u8>, rect: &Rect) {
    write_i32(bytes, rect.x);
    write_i32(bytes, rect.y);
    write_i32(bytes, rect.w);
    write_i32(bytes, rect.h);
}

// Readers below assume the caller already checked the length.

fn take4(data: &mut &[u8]) -> [u8; 4] {
    let (head, rest) = data.split_at(4);
    *data = rest;
    [head[0], head[1], head[2], head[3]]
}

fn skip(data: &mut &[u8], len: usize) {
    *data = &data[len..];
}

fn read_u32(data: &mut &[u8]) -> u32 {
    u32::from_ne_bytes(take4(data))
}

fn read_i32(data: &mut &[u8]) -> i32 {
    i32::from_ne_bytes(take4(data))
}

fn read_f32(data: &mut &[u8]) -> f32 {
    f32::from_ne_bytes(take4(data))
}
