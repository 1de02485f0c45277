use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use super::protocol::{MAX_DATAGRAM_PAYLOAD, MAX_PACKET_SIZE, Packet, ProtocolError};
use super::stats::{NetworkStats, StatsCounters};

pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("failed to configure socket: {0}")]
    Configure(io::Error),
    #[error("failed to send to {to}: {source}")]
    Send { to: SocketAddr, source: io::Error },
    #[error("receive failed: {0}")]
    Recv(io::Error),
    #[error("malformed packet from {from}: {source}")]
    Malformed {
        from: SocketAddr,
        source: ProtocolError,
    },
    #[error("cannot encode packet: {0}")]
    Encode(ProtocolError),
}

/// One UDP socket. Receives block for at most the configured timeout so the
/// calling loop can check its running flag.
pub struct Endpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    recv_buffer: Box<[u8]>,
    stats: Arc<StatsCounters>,
}

impl Endpoint {
    pub fn bind<A: ToSocketAddrs + std::fmt::Debug>(
        addr: A,
        recv_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(&addr).map_err(|source| TransportError::Bind {
            addr: format!("{:?}", addr),
            source,
        })?;
        socket
            .set_read_timeout(Some(recv_timeout))
            .map_err(TransportError::Configure)?;
        let local_addr = socket.local_addr().map_err(TransportError::Configure)?;

        log::info!("Bound on {}", local_addr);

        Ok(Self {
            socket,
            local_addr,
            recv_buffer: vec![0u8; MAX_PACKET_SIZE].into_boxed_slice(),
            stats: Arc::new(StatsCounters::default()),
        })
    }

    /// Second handle onto the same socket, sharing the traffic counters.
    pub fn try_clone(&self) -> Result<Self, TransportError> {
        let socket = self.socket.try_clone().map_err(TransportError::Configure)?;
        Ok(Self {
            socket,
            local_addr: self.local_addr,
            recv_buffer: vec![0u8; MAX_PACKET_SIZE].into_boxed_slice(),
            stats: Arc::clone(&self.stats),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> NetworkStats {
        self.stats.snapshot()
    }

    pub fn send_to(&self, packet: &Packet, addr: SocketAddr) -> Result<usize, TransportError> {
        let data = packet.encode().map_err(TransportError::Encode)?;
        debug_assert!(data.len() <= MAX_DATAGRAM_PAYLOAD);

        let bytes = self
            .socket
            .send_to(&data, addr)
            .map_err(|source| TransportError::Send { to: addr, source })?;
        self.stats.record_sent(bytes);
        Ok(bytes)
    }

    /// `Ok(None)` when nothing arrived before the timeout.
    pub fn recv(&mut self) -> Result<Option<(Packet, SocketAddr)>, TransportError> {
        let (size, from) = match self.socket.recv_from(&mut self.recv_buffer) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Ok(None);
            }
            Err(e) => return Err(TransportError::Recv(e)),
        };

        self.stats.record_received(size);

        match Packet::decode(&self.recv_buffer[..size]) {
            Ok(packet) => Ok(Some((packet, from))),
            Err(source) => {
                self.stats.record_malformed();
                Err(TransportError::Malformed { from, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> Endpoint {
        Endpoint::bind("127.0.0.1:0", Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn recv_times_out_with_none() {
        let mut endpoint = Endpoint::bind("127.0.0.1:0", Duration::from_millis(10)).unwrap();
        assert!(endpoint.recv().unwrap().is_none());
    }

    #[test]
    fn send_and_receive_control_packet() {
        let mut a = loopback();
        let b = loopback();

        b.send_to(&Packet::Syn, a.local_addr()).unwrap();
        let (packet, from) = a.recv().unwrap().expect("packet");

        assert_eq!(packet, Packet::Syn);
        assert_eq!(from, b.local_addr());
        assert_eq!(b.stats().packets_sent, 1);
        assert_eq!(b.stats().bytes_sent, 4);
        assert_eq!(a.stats().packets_received, 1);
    }

    #[test]
    fn malformed_datagram_is_reported_and_counted() {
        let mut a = loopback();
        let raw = UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(&[1, 2], a.local_addr()).unwrap();

        let err = a.recv().unwrap_err();
        assert!(matches!(err, TransportError::Malformed { .. }));
        assert_eq!(a.stats().packets_malformed, 1);

        // The socket keeps working afterwards.
        raw.send_to(&2u32.to_ne_bytes(), a.local_addr()).unwrap();
        assert_eq!(a.recv().unwrap().map(|(p, _)| p), Some(Packet::Ack));
    }

    #[test]
    fn clones_share_counters() {
        let a = loopback();
        let clone = a.try_clone().unwrap();
        let target = loopback();

        clone.send_to(&Packet::SynAck, target.local_addr()).unwrap();
        assert_eq!(a.stats().packets_sent, 1);
    }
}
