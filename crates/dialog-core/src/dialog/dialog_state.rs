use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a recording call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallState {
    /// INVITE received, 200 OK not yet sent
    Early,

    /// 200 OK sent, waiting for the ACK
    AwaitingAck,

    /// ACK received
    Confirmed,

    /// BYE sent or received
    Terminated,
}

impl CallState {
    /// The ACK has arrived or the call has ended
    pub fn is_settled(&self) -> bool {
        matches!(self, CallState::Confirmed | CallState::Terminated)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Early => "EARLY",
            CallState::AwaitingAck => "AWAITING_ACK",
            CallState::Confirmed => "CONFIRMED",
            CallState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}
