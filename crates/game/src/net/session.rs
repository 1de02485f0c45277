use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use super::endpoint::{Endpoint, TransportError};
use super::handshake::{ConnectionState, Handshake, Transition};
use super::protocol::Packet;
use super::receiver::{self, NetEvent};
use super::stats::NetworkStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Both players in one process, no socket.
    Local,
    /// Authoritative side: accepts a join, simulates, broadcasts state.
    Host,
    /// Connects to a host, sends input, adopts the host's state.
    Join,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("session has no peer yet")]
    NoPeer,
    #[error("local session has no socket")]
    Offline,
    #[error("shut down before the handshake completed")]
    Cancelled,
    #[error("failed to start receive thread: {0}")]
    Spawn(std::io::Error),
}

/// Network context for one process: socket, peer, handshake progress, role.
pub struct Session {
    role: Role,
    endpoint: Option<Endpoint>,
    peer: Option<SocketAddr>,
    state: ConnectionState,
}

impl Session {
    pub fn local() -> Self {
        Self {
            role: Role::Local,
            endpoint: None,
            peer: None,
            state: ConnectionState::Game,
        }
    }

    pub fn host(endpoint: Endpoint) -> Self {
        Self {
            role: Role::Host,
            endpoint: Some(endpoint),
            peer: None,
            state: ConnectionState::WaitSyn,
        }
    }

    pub fn join(endpoint: Endpoint, peer: SocketAddr) -> Self {
        Self {
            role: Role::Join,
            endpoint: Some(endpoint),
            peer: Some(peer),
            state: ConnectionState::WaitAck,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.endpoint.as_ref().map(Endpoint::local_addr)
    }

    pub fn stats(&self) -> NetworkStats {
        self.endpoint
            .as_ref()
            .map(Endpoint::stats)
            .unwrap_or_default()
    }

    /// Runs the handshake to completion. Blocks until the state reaches
    /// `Game` or `running` is cleared; lost packets are never resent.
    pub fn wait_for_game(&mut self, running: &AtomicBool) -> Result<(), SessionError> {
        let mut handshake = match self.role {
            Role::Local => return Ok(()),
            Role::Host => Handshake::host(),
            Role::Join => {
                let (handshake, syn) = Handshake::join();
                if let Err(e) = self.send(&syn) {
                    log::warn!("{}", e);
                }
                handshake
            }
        };
        self.state = handshake.state();

        while !handshake.is_connected() {
            if !running.load(Ordering::SeqCst) {
                return Err(SessionError::Cancelled);
            }

            let endpoint = self.endpoint.as_mut().ok_or(SessionError::Offline)?;
            let (packet, from) = match endpoint.recv() {
                Ok(Some(received)) => received,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };

            if let Transition::Reply { packet, adopt_peer } = handshake.on_packet(&packet, from) {
                if let Some(peer) = adopt_peer {
                    self.peer = Some(peer);
                }
                if let Err(e) = self.send(&packet) {
                    log::warn!("{}", e);
                }
            }
            self.state = handshake.state();
        }

        log::info!(
            "{:?} session connected to {}",
            self.role,
            self.peer.map_or_else(|| "?".to_string(), |p| p.to_string())
        );
        Ok(())
    }

    pub fn send(&self, packet: &Packet) -> Result<usize, SessionError> {
        let endpoint = self.endpoint.as_ref().ok_or(SessionError::Offline)?;
        let peer = self.peer.ok_or(SessionError::NoPeer)?;
        Ok(endpoint.send_to(packet, peer)?)
    }

    /// Starts the background receive loop on a clone of the socket. The loop
    /// only forwards decoded events; it never touches game state.
    pub fn spawn_receiver(
        &self,
        running: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, Receiver<NetEvent>), SessionError> {
        let endpoint = self.endpoint.as_ref().ok_or(SessionError::Offline)?;
        let peer = self.peer.ok_or(SessionError::NoPeer)?;
        let endpoint = endpoint.try_clone()?;
        receiver::spawn(endpoint, self.role, peer, running).map_err(SessionError::Spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_session_is_immediately_in_game() {
        let mut session = Session::local();
        let running = AtomicBool::new(true);

        session.wait_for_game(&running).unwrap();

        assert_eq!(session.state(), ConnectionState::Game);
        assert_eq!(session.role(), Role::Local);
        assert!(matches!(
            session.send(&Packet::Syn),
            Err(SessionError::Offline)
        ));
    }

    #[test]
    fn host_without_peer_cannot_send() {
        let endpoint =
            Endpoint::bind("127.0.0.1:0", std::time::Duration::from_millis(10)).unwrap();
        let session = Session::host(endpoint);
        assert!(matches!(
            session.send(&Packet::Ack),
            Err(SessionError::NoPeer)
        ));
    }

    #[test]
    fn cleared_running_flag_cancels_handshake() {
        let endpoint =
            Endpoint::bind("127.0.0.1:0", std::time::Duration::from_millis(10)).unwrap();
        let mut session = Session::host(endpoint);
        let running = AtomicBool::new(false);

        assert!(matches!(
            session.wait_for_game(&running),
            Err(SessionError::Cancelled)
        ));
        assert_eq!(session.state(), ConnectionState::WaitSyn);
    }
}
