//! Transport abstraction

pub mod udp;

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;
use siprec_sip_core::Message;

use crate::error::Result;

/// Events emitted by a transport's receive loop
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A datagram arrived and was parsed
    MessageReceived {
        message: Message,
        /// Where the datagram actually came from
        source: SocketAddr,
        /// The local address it arrived on
        destination: SocketAddr,
    },

    /// A receive error that did not stop the loop
    Error { error: String },

    /// The receive loop has stopped
    Closed,
}

/// A datagram transport for SIP text
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// The address the transport is bound to
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Send an already serialized message
    async fn send_message(&self, data: Bytes, destination: SocketAddr) -> Result<()>;

    /// Stop the receive loop and refuse further sends
    async fn close(&self) -> Result<()>;

    fn is_closed(&self) -> bool;
}
