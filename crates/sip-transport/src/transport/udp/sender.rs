use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::trace;

use crate::error::Result;

/// Sending half of the UDP transport; shares the listener's socket
#[derive(Clone)]
pub struct UdpSender {
    socket: Arc<UdpSocket>,
}

impl UdpSender {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    pub async fn send(&self, data: &[u8], destination: SocketAddr) -> Result<()> {
        let sent = self.socket.send_to(data, destination).await?;
        trace!("Sent {} of {} bytes to {}", sent, data.len(), destination);
        Ok(())
    }
}
