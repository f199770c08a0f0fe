//! Builders that serialize SIP messages to wire text
//!
//! Both builders collect headers in insertion order and compute
//! `Content-Length` from the body at build time, so it always matches the
//! exact byte length of what is sent.
//!
//! ```
//! use siprec_sip_core::{parse_message, ResponseBuilder, StatusCode};
//!
//! let text = ResponseBuilder::new(StatusCode::Trying)
//!     .header("Call-ID", "abc@host")
//!     .build();
//!
//! assert!(text.starts_with("SIP/2.0 100 Trying\r\n"));
//! assert_eq!(parse_message(&text).header("Content-Length"), Some("0"));
//! ```

mod request;
mod response;

pub use request::RequestBuilder;
pub use response::ResponseBuilder;

use crate::parser::CRLF;
use crate::types::{names_match, Headers};

/// Render start-line, headers, computed Content-Length and body
fn serialize(start_line: &str, headers: &Headers, body: &str) -> String {
    let mut out = String::with_capacity(start_line.len() + body.len() + 256);
    out.push_str(start_line);
    out.push_str(CRLF);
    for entry in headers.iter().filter(|e| !names_match(e.name(), "Content-Length")) {
        for value in entry.values() {
            out.push_str(entry.name());
            out.push_str(": ");
            out.push_str(value);
            out.push_str(CRLF);
        }
    }
    out.push_str(&format!("Content-Length: {}", body.len()));
    out.push_str(CRLF);
    out.push_str(CRLF);
    out.push_str(body);
    out
}
