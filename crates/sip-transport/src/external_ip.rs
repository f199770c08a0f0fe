//! Discovery of the address to advertise
//!
//! The server binds to `0.0.0.0`, which cannot go into a `Contact` header or
//! an SDP `c=` line. Connecting a throwaway UDP socket toward a public address
//! makes the OS pick the outbound interface; its address is what peers can
//! reach. Connecting a UDP socket sends nothing.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::error::Result;

/// Public address used to select the outbound interface
pub const DEFAULT_PROBE_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

/// The local address the OS would use to reach `probe`
pub async fn discover_external_ip(probe: SocketAddr) -> Result<IpAddr> {
    let bind_addr: SocketAddr = match probe {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (std::net::Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(probe).await?;
    let ip = socket.local_addr()?.ip();
    debug!("Outbound interface toward {} is {}", probe, ip);
    Ok(ip)
}

/// [`discover_external_ip`] toward [`DEFAULT_PROBE_ADDR`], falling back to loopback
pub async fn external_ip_or_loopback() -> IpAddr {
    match discover_external_ip(DEFAULT_PROBE_ADDR).await {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(e) => {
            warn!("Could not determine external IP, using 127.0.0.1: {}", e);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}
