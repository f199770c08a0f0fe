//! SIP message parsing
//!
//! The recorder listens on plain UDP, where truncated or garbled datagrams
//! are a fact of life. Parsing here is therefore tolerant: it never fails and
//! always hands back whatever structure it could recover.

mod message;

pub use message::{parse_bytes, parse_header_lines, parse_message, split_head_body, CRLF};
