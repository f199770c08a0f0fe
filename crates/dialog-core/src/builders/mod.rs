//! Message synthesis
//!
//! Builders for every message the server emits: 100 Trying, the three 200 OK
//! variants and the server-initiated BYE. They are pure functions of the
//! triggering request, the datagram source and session data, and return wire
//! text ready to send.

pub mod request_builders;
pub mod response_builders;
pub mod sdp_answer;

use std::fmt;
use std::net::IpAddr;

pub use request_builders::{bye_request, remote_target};
pub use response_builders::{ok_bye, ok_invite, ok_options, trying, with_to_tag};
pub use sdp_answer::build_sdp_answer;

/// Extensions advertised in Supported
pub const SUPPORTED_EXTENSIONS: &str = "siprec, timer";

/// Methods advertised in Allow
pub const ALLOWED_METHODS: &str = "INVITE, ACK, BYE, OPTIONS";

/// Body types advertised in Accept
pub const ACCEPTED_CONTENT: &str = "application/sdp, multipart/mixed, application/rs-metadata+xml";

/// How this server names itself in Contact, Via, Server and SDP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    /// Advertised address
    pub ip: IpAddr,
    /// Port the transport is bound to
    pub port: u16,
    pub user_agent: String,
}

impl ServerIdentity {
    pub fn new(ip: IpAddr, port: u16, user_agent: impl Into<String>) -> Self {
        Self {
            ip,
            port,
            user_agent: user_agent.into(),
        }
    }

    /// `ip:port`, bracketing IPv6 addresses
    pub fn host_port(&self) -> String {
        match self.ip {
            IpAddr::V4(ip) => format!("{}:{}", ip, self.port),
            IpAddr::V6(ip) => format!("[{}]:{}", ip, self.port),
        }
    }

    /// Contact URI without parameters
    pub fn contact(&self) -> String {
        format!("<sip:{}>", self.host_port())
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host_port())
    }
}
