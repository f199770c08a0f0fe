//! UDP transport for the SIPREC recording server
//!
//! One socket serves both directions: a receive loop parses every datagram
//! and publishes it as a [`TransportEvent`], and the same socket sends
//! responses and server-initiated requests. Higher layers depend only on the
//! [`Transport`] trait, which lets tests substitute a capturing mock.
//!
//! [`external_ip`] finds the address to advertise in `Contact` headers and
//! SDP connection lines.

pub mod error;
pub mod external_ip;
pub mod transport;

pub use error::{Error, Result};
pub use external_ip::{discover_external_ip, external_ip_or_loopback, DEFAULT_PROBE_ADDR};
pub use transport::udp::UdpTransport;
pub use transport::{Transport, TransportEvent};

/// Bind a UDP transport to the specified address
pub async fn bind_udp(
    addr: std::net::SocketAddr,
) -> Result<(UdpTransport, tokio::sync::mpsc::Receiver<TransportEvent>)> {
    UdpTransport::bind(addr, None).await
}

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{bind_udp, external_ip_or_loopback, Error, Result, Transport, TransportEvent, UdpTransport};
}
