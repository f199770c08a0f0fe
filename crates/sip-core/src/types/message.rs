//! Parsed SIP messages
//!
//! [`Message`] is the structure produced by [`parse_message`](crate::parse_message):
//! a start-line, an ordered multi-valued header map and an opaque body. It holds
//! requests and responses alike; the typed accessors below interpret the
//! pieces on demand and report [`Error::MalformedMessage`] when the piece they
//! need is missing.

use std::fmt;

use crate::error::{Error, Result};
use super::cseq::CSeq;
use super::headers::Headers;
use super::method::Method;

/// SIP protocol version emitted and accepted by this stack
pub const SIP_VERSION: &str = "SIP/2.0";

/// A request start-line: `METHOD Request-URI SIP/2.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub uri: String,
    pub version: String,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.uri, self.version)
    }
}

/// A best-effort parsed SIP message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub start_line: String,
    pub headers: Headers,
    pub body: String,
}

impl Message {
    /// True when nothing at all could be recovered from the input
    pub fn is_empty(&self) -> bool {
        self.start_line.is_empty() && self.headers.is_empty() && self.body.is_empty()
    }

    /// Responses start with the protocol version; everything else is treated as a request.
    pub fn is_response(&self) -> bool {
        self.start_line.starts_with("SIP/")
    }

    /// The request method, taken from the first start-line token.
    ///
    /// Returns `None` for responses and for an empty start-line.
    pub fn method(&self) -> Option<Method> {
        if self.is_response() {
            return None;
        }
        self.start_line.split_whitespace().next().map(Method::from)
    }

    /// Strictly parse the start-line as a request line
    pub fn request_line(&self) -> Result<RequestLine> {
        let mut parts = self.start_line.split_whitespace();
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(method), Some(uri), Some(version), None) if version == SIP_VERSION => Ok(RequestLine {
                method: Method::from(method),
                uri: uri.to_string(),
                version: version.to_string(),
            }),
            _ => Err(Error::malformed_message(format!(
                "Invalid request line: '{}'",
                self.start_line
            ))),
        }
    }

    /// The numeric status of a response
    pub fn status_code(&self) -> Option<u16> {
        if !self.is_response() {
            return None;
        }
        self.start_line.split_whitespace().nth(1)?.parse().ok()
    }

    /// First value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// All values of a header in arrival order
    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers.get_all(name)
    }

    /// A header that must be present
    pub fn required_header(&self, name: &str) -> Result<&str> {
        self.header(name)
            .ok_or_else(|| Error::malformed_message(format!("Missing {} header", name)))
    }

    pub fn call_id(&self) -> Option<&str> {
        self.header("Call-ID").filter(|id| !id.is_empty())
    }

    pub fn cseq(&self) -> Result<CSeq> {
        self.required_header("CSeq")?.parse()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}
