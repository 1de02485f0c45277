use std::net::SocketAddr;

use super::protocol::Packet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    WaitSyn,
    WaitAck,
    WaitSynAck,
    Game,
}

/// What the driver has to do after feeding a packet to the handshake.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Unexpected packet for the current state; nothing changed.
    Ignored,
    /// Send `packet` to the peer. If `adopt_peer` is set, that address
    /// becomes the peer first.
    Reply {
        packet: Packet,
        adopt_peer: Option<SocketAddr>,
    },
    Connected,
}

/// Three-way SYN / ACK / SYNACK exchange. The host waits for a SYN, the
/// joining side sends one. There is no timeout and no retransmission: if a
/// packet is lost the exchange stalls.
#[derive(Debug, Clone)]
pub struct Handshake {
    state: ConnectionState,
}

impl Handshake {
    pub fn host() -> Self {
        Self {
            state: ConnectionState::WaitSyn,
        }
    }

    /// Returns the machine in `WaitAck` together with the SYN the caller must
    /// send to the configured peer.
    pub fn join() -> (Self, Packet) {
        (
            Self {
                state: ConnectionState::WaitAck,
            },
            Packet::Syn,
        )
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Game
    }

    pub fn on_packet(&mut self, packet: &Packet, from: SocketAddr) -> Transition {
        match (self.state, packet) {
            (ConnectionState::WaitSyn, Packet::Syn) => {
                log::info!("SYN received from {}, sending ACK", from);
                self.state = ConnectionState::WaitSynAck;
                Transition::Reply {
                    packet: Packet::Ack,
                    adopt_peer: Some(from),
                }
            }
            (ConnectionState::WaitAck, Packet::Ack) => {
                log::info!("ACK received, sending SYNACK");
                self.state = ConnectionState::Game;
                Transition::Reply {
                    packet: Packet::SynAck,
                    adopt_peer: None,
                }
            }
            (ConnectionState::WaitSynAck, Packet::SynAck) => {
                log::info!("Got SYNACK");
                self.state = ConnectionState::Game;
                Transition::Connected
            }
            (state, packet) => {
                log::debug!("ignoring {:?} in {:?}", packet.kind(), state);
                Transition::Ignored
            }
        }
    }
}
