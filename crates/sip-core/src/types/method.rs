//! SIP request methods

use std::fmt;

/// A SIP request method as read from a request start-line.
///
/// Methods this server does not handle are kept verbatim in [`Method::Other`]
/// so they can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Invite,
    Ack,
    Bye,
    Options,
    Cancel,
    Register,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Invite => "INVITE",
            Method::Ack => "ACK",
            Method::Bye => "BYE",
            Method::Options => "OPTIONS",
            Method::Cancel => "CANCEL",
            Method::Register => "REGISTER",
            Method::Other(token) => token,
        }
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        // Method tokens are case-sensitive (RFC 3261 Section 7.1)
        match token {
            "INVITE" => Method::Invite,
            "ACK" => Method::Ack,
            "BYE" => Method::Bye,
            "OPTIONS" => Method::Options,
            "CANCEL" => Method::Cancel,
            "REGISTER" => Method::Register,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
