use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::net::UdpSocket;
use tracing::trace;

use crate::error::Result;

// Largest possible UDP payload
const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Receiving half of the UDP transport
pub struct UdpListener {
    socket: Arc<UdpSocket>,
}

impl UdpListener {
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket: Arc::new(socket) })
    }

    /// Wait for the next datagram; returns payload, source and local address
    pub async fn receive(&self) -> Result<(Bytes, SocketAddr, SocketAddr)> {
        let mut buf = BytesMut::zeroed(MAX_DATAGRAM_SIZE);
        let (len, src) = self.socket.recv_from(&mut buf).await?;
        buf.truncate(len);
        trace!("Received {} bytes from {}", len, src);
        Ok((buf.freeze(), src, self.socket.local_addr()?))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Share the socket with a sender
    pub fn clone_socket(&self) -> Arc<UdpSocket> {
        self.socket.clone()
    }
}
