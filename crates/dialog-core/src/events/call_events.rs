use std::fmt;
use std::net::SocketAddr;

use siprec_sip_core::SessionDescription;

/// Why a call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The peer sent BYE
    RemoteBye,
    /// The teardown timer sent our BYE
    LocalTeardown,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::RemoteBye => f.write_str("remote BYE"),
            TerminationReason::LocalTeardown => f.write_str("local teardown"),
        }
    }
}

/// Events published by the call manager
#[derive(Debug, Clone)]
pub enum CallEvent {
    /// 200 OK sent; the offer tells the media sink what to expect
    CallEstablished {
        call_id: String,
        peer: SocketAddr,
        offer: SessionDescription,
        metadata: Option<String>,
    },

    /// ACK received
    CallConfirmed { call_id: String },

    /// No ACK within the configured timeout; the call stays up
    AckTimeout { call_id: String },

    /// Call removed from the table
    CallTerminated {
        call_id: String,
        reason: TerminationReason,
    },
}

impl CallEvent {
    pub fn call_id(&self) -> &str {
        match self {
            CallEvent::CallEstablished { call_id, .. }
            | CallEvent::CallConfirmed { call_id }
            | CallEvent::AckTimeout { call_id }
            | CallEvent::CallTerminated { call_id, .. } => call_id,
        }
    }
}
