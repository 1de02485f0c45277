use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::endpoint::{Endpoint, TransportError};
use super::protocol::Packet;
use super::session::Role;
use crate::simulation::Command;
use crate::state::GameState;

/// Decoded traffic handed from the receive thread to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    /// Remote input for the host to merge into its command buffer.
    Commands(Vec<Command>),
    /// Authoritative state for the joining side to adopt wholesale.
    Update(GameState),
}

impl NetEvent {
    /// Keeps only the traffic `role` consumes once the game is running.
    pub fn from_packet(role: Role, packet: Packet) -> Option<Self> {
        match (role, packet) {
            (Role::Host, Packet::Cmd(commands)) => Some(NetEvent::Commands(commands)),
            (Role::Join, Packet::Update(state)) => Some(NetEvent::Update(state)),
            _ => None,
        }
    }
}

pub(crate) fn spawn(
    endpoint: Endpoint,
    role: Role,
    peer: SocketAddr,
    running: Arc<AtomicBool>,
) -> std::io::Result<(JoinHandle<()>, Receiver<NetEvent>)> {
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("net-recv".into())
        .spawn(move || receive_loop(endpoint, role, peer, running, tx))?;
    Ok((handle, rx))
}

fn receive_loop(
    mut endpoint: Endpoint,
    role: Role,
    peer: SocketAddr,
    running: Arc<AtomicBool>,
    tx: Sender<NetEvent>,
) {
    while running.load(Ordering::SeqCst) {
        let (packet, from) = match endpoint.recv() {
            Ok(Some(received)) => received,
            Ok(None) => continue,
            Err(e @ TransportError::Malformed { .. }) => {
                log::debug!("dropping packet: {}", e);
                continue;
            }
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };

        if from != peer {
            log::debug!("ignoring {:?} from unknown sender {}", packet.kind(), from);
            continue;
        }

        let Some(event) = NetEvent::from_packet(role, packet) else {
            continue;
        };

        if tx.send(event).is_err() {
            break;
        }
    }

    log::debug!("receive loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerId;

    #[test]
    fn host_keeps_only_commands() {
        let commands = vec![Command::movement(PlayerId::Two, 1.0, 3)];
        assert_eq!(
            NetEvent::from_packet(Role::Host, Packet::Cmd(commands.clone())),
            Some(NetEvent::Commands(commands))
        );
        assert_eq!(
            NetEvent::from_packet(Role::Host, Packet::Update(GameState::new())),
            None
        );
        assert_eq!(NetEvent::from_packet(Role::Host, Packet::Syn), None);
    }

    #[test]
    fn join_keeps_only_updates() {
        let state = GameState::new();
        assert_eq!(
            NetEvent::from_packet(Role::Join, Packet::Update(state)),
            Some(NetEvent::Update(state))
        );
        assert_eq!(
            NetEvent::from_packet(Role::Join, Packet::Cmd(Vec::new())),
            None
        );
    }

    #[test]
    fn local_consumes_nothing() {
        assert_eq!(
            NetEvent::from_packet(Role::Local, Packet::Cmd(Vec::new())),
            None
        );
    }
}
