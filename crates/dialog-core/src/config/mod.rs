//! Server configuration
//!
//! [`ServerConfig`] deserializes from a TOML table where every field is
//! optional; missing fields take the defaults below.
//!
//! ```rust
//! use std::time::Duration;
//! use siprec_dialog_core::config::ServerConfig;
//!
//! let config = ServerConfig::default()
//!     .with_ack_timeout(Duration::from_secs(5))
//!     .with_advertised_ip("192.0.2.10".parse().unwrap());
//!
//! assert_eq!(config.ack_timeout(), Duration::from_secs(5));
//! assert_eq!(config.teardown_after(), Duration::from_secs(10));
//! ```

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{DialogError, DialogResult};

/// Default SIP listening address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5060";

/// Runtime settings for the recording server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the UDP socket binds to
    pub bind_addr: SocketAddr,

    /// Address put in Contact headers and SDP; discovered when absent
    pub advertised_ip: Option<IpAddr>,

    /// How long to wait for the ACK after the 200 OK
    pub ack_timeout_secs: u64,

    /// Delay between ACK and the server-initiated BYE
    pub teardown_after_secs: u64,

    /// RTP port of each answered stream, in offer order
    pub media_ports: Vec<u16>,

    /// Value of the Session-Expires header in the INVITE 200 OK
    pub session_expires: u32,

    /// Sent in the Server header
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5060)),
            advertised_ip: None,
            ack_timeout_secs: 30,
            teardown_after_secs: 10,
            media_ports: vec![10000, 10002],
            session_expires: 1800,
            user_agent: format!("siprec-uas/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServerConfig {
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_advertised_ip(mut self, ip: IpAddr) -> Self {
        self.advertised_ip = Some(ip);
        self
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_teardown_after(mut self, delay: Duration) -> Self {
        self.teardown_after_secs = delay.as_secs();
        self
    }

    pub fn with_media_ports(mut self, ports: Vec<u16>) -> Self {
        self.media_ports = ports;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_secs(self.ack_timeout_secs)
    }

    pub fn teardown_after(&self) -> Duration {
        Duration::from_secs(self.teardown_after_secs)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> DialogResult<()> {
        if self.media_ports.is_empty() {
            return Err(DialogError::configuration("media_ports must not be empty"));
        }
        if self.media_ports.contains(&0) {
            return Err(DialogError::configuration("media_ports must not contain 0"));
        }
        if self.ack_timeout_secs == 0 {
            return Err(DialogError::configuration("ack_timeout_secs must be positive"));
        }
        Ok(())
    }
}
