mod endpoint;
mod handshake;
mod protocol;
mod receiver;
mod session;
mod stats;

pub use endpoint::{DEFAULT_RECV_TIMEOUT, Endpoint, TransportError};
pub use handshake::{ConnectionState, Handshake, Transition};
pub use protocol::{
    COMMAND_HEADER_SIZE, COMMAND_SIZE, CONTROL_PACKET_SIZE, DEFAULT_PORT, GAME_STATE_SIZE,
    MAX_COMMANDS_PER_PACKET, MAX_PACKET_SIZE, Packet, PacketKind, ProtocolError,
    UPDATE_PACKET_SIZE, encode_commands,
};
pub use receiver::NetEvent;
pub use session::{Role, Session, SessionError};
pub use stats::NetworkStats;
