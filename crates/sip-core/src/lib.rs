//! # siprec-sip-core
//!
//! SIP message handling for a SIPREC recording server
//! ([RFC 7866](https://datatracker.ietf.org/doc/html/rfc7866)).
//!
//! The crate covers the text side of the protocol and performs no I/O:
//!
//! - [`parse_message`]: tolerant parsing of a datagram into a [`Message`]
//! - [`normalize_via`]: `rport`/`received` rewriting and canonical Via parameter order
//! - [`MultipartBody`]: splitting `multipart/mixed` INVITE bodies into SDP and metadata
//! - [`sdp::parse_sdp`]: multi-stream SDP offers with per-stream attribute maps
//! - [`ResponseBuilder`] / [`RequestBuilder`]: wire serialization with exact Content-Length
//!
//! ```
//! use siprec_sip_core::prelude::*;
//!
//! let raw = "OPTIONS sip:srs@10.0.0.1 SIP/2.0\r\n\
//!            Via: SIP/2.0/UDP 10.0.0.2:5060;branch=z9hG4bK1;rport\r\n\
//!            Call-ID: ping-1\r\n\
//!            CSeq: 1 OPTIONS\r\n\
//!            \r\n";
//!
//! let msg = parse_message(raw);
//! assert_eq!(msg.method(), Some(Method::Options));
//!
//! let via = normalize_via(msg.header("Via").unwrap(), "10.0.0.2:6000".parse().unwrap());
//! assert!(via.ends_with(";rport=6000;received=10.0.0.2;branch=z9hG4bK1"));
//! ```

pub mod builder;
pub mod error;
pub mod parser;
pub mod sdp;
pub mod types;

pub use builder::{RequestBuilder, ResponseBuilder};
pub use error::{Error, Result};
pub use parser::{parse_bytes, parse_message, CRLF};
pub use sdp::{parse_sdp, MediaDescription, SessionDescription, SessionInfo};
pub use types::{
    extract_parts, normalize_via, split_via_values, BodyKind, CSeq, Headers, Message, Method, MultipartBody, Part,
    RequestLine, StatusCode, ViaParam, ViaParams,
};

/// Commonly used items
pub mod prelude {
    pub use crate::builder::{RequestBuilder, ResponseBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::parser::{parse_bytes, parse_message};
    pub use crate::sdp::{parse_sdp, MediaDescription, SessionDescription};
    pub use crate::types::{
        extract_parts, normalize_via, split_via_values, BodyKind, CSeq, Headers, Message, Method, MultipartBody,
        StatusCode, ViaParams,
    };
}
