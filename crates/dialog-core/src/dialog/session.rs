//! Per-call state
//!
//! A [`CallSession`] is owned by the call table actor and only ever changed
//! through the transition methods below, which enforce the state machine.

use std::net::SocketAddr;

use rand::Rng;
use siprec_sip_core::{Message, SessionDescription};
use tokio::time::Instant;
use tracing::debug;

use super::dialog_state::CallState;
use crate::errors::{DialogError, DialogResult};

/// Generate a To/From tag: 8 hex digits
pub fn generate_tag() -> String {
    let mut rng = rand::thread_rng();
    format!("{:08x}", rng.gen::<u32>())
}

/// One recording call
#[derive(Debug, Clone)]
pub struct CallSession {
    pub call_id: String,

    /// Where the INVITE came from; the server-initiated BYE goes here
    pub peer: SocketAddr,

    /// The INVITE that created the call
    pub invite: Message,

    /// Our tag, generated once and reused for every in-dialog message
    pub to_tag: String,

    /// The parsed SDP offer, once the call is answered
    pub offer: Option<SessionDescription>,

    /// Recording metadata XML from the INVITE, if any
    pub metadata: Option<String>,

    pub created_at: Instant,

    state: CallState,
    ack_received: bool,
}

impl CallSession {
    pub fn new(call_id: impl Into<String>, peer: SocketAddr, invite: Message) -> Self {
        Self {
            call_id: call_id.into(),
            peer,
            invite,
            to_tag: generate_tag(),
            offer: None,
            metadata: None,
            created_at: Instant::now(),
            state: CallState::Early,
            ack_received: false,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn ack_received(&self) -> bool {
        self.ack_received
    }

    /// Record that the 200 OK went out.
    ///
    /// An ACK may overtake this step; a call that is already confirmed stays
    /// confirmed.
    pub fn mark_answered(&mut self, offer: SessionDescription, metadata: Option<String>) -> DialogResult<()> {
        match self.state {
            CallState::Early => self.state = CallState::AwaitingAck,
            CallState::Confirmed => {}
            from => return Err(DialogError::invalid_transition(from, "200 OK")),
        }
        self.offer = Some(offer);
        self.metadata = metadata;
        debug!("Call {} answered, now {}", self.call_id, self.state);
        Ok(())
    }

    /// Apply the ACK; valid unless already confirmed or terminated
    pub fn receive_ack(&mut self) -> DialogResult<()> {
        if self.state.is_settled() {
            return Err(DialogError::invalid_transition(self.state, "ACK"));
        }
        self.ack_received = true;
        self.state = CallState::Confirmed;
        Ok(())
    }

    /// Move to `Terminated`; returns false if already there
    pub fn terminate(&mut self) -> bool {
        if self.state == CallState::Terminated {
            return false;
        }
        self.state = CallState::Terminated;
        true
    }
}
