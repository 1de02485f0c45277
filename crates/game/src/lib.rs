pub mod board;
pub mod config;
pub mod input;
pub mod net;
pub mod peer;
pub mod simulation;
pub mod state;

pub use board::Rect;
pub use config::{ConfigError, DEFAULT_FRAME_RATE, SessionConfig};
pub use input::{Controls, Intents, SERVE_DIRECTION};
pub use net::{
    ConnectionState, DEFAULT_PORT, Endpoint, NetEvent, NetworkStats, Packet, PacketKind,
    ProtocolError, Role, Session, SessionError, TransportError,
};
pub use peer::{Peer, SessionClock};
pub use simulation::{Action, Command, CommandBuffer, CommandKind, advance};
pub use state::{Ball, GameState, Player, PlayerId};
