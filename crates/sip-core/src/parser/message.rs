// Tolerant SIP message parsing

use crate::types::{Headers, Message};

/// Line terminator used on the wire
pub const CRLF: &str = "\r\n";

/// Split raw text at the first empty line into head and body.
///
/// CRLF-CRLF is preferred; a bare LF-LF separator is accepted as a fallback.
/// Without a separator the whole input is head and the body is empty.
pub fn split_head_body(raw: &str) -> (&str, &str) {
    if let Some(split) = raw.split_once("\r\n\r\n") {
        return split;
    }
    if let Some(split) = raw.split_once("\n\n") {
        return split;
    }
    (raw, "")
}

/// Collect `Name: Value` lines into a header map.
///
/// Lines without a colon, or with an empty name, are skipped. Names and values
/// are trimmed.
pub fn parse_header_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Headers {
    let mut headers = Headers::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        headers.append(name, value.trim());
    }
    headers
}

/// Parse SIP text into a [`Message`].
///
/// The first line of the head is the start-line, the remaining lines are
/// headers. CRLFs before the start-line are skipped. Repeated headers
/// accumulate in order. Empty or unterminated input
/// yields an empty or partial message rather than an error.
///
/// # Examples
///
/// ```
/// use siprec_sip_core::{parse_message, Method};
///
/// let msg = parse_message("ACK sip:srs@10.0.0.1 SIP/2.0\r\nCall-ID: abc\r\n\r\n");
/// assert_eq!(msg.method(), Some(Method::Ack));
/// assert_eq!(msg.call_id(), Some("abc"));
/// assert!(msg.body.is_empty());
/// ```
pub fn parse_message(raw: &str) -> Message {
    // Empty lines ahead of the start-line are ignored (RFC 3261 §7.5)
    let raw = raw.trim_start_matches(&['\r', '\n'][..]);
    let (head, body) = split_head_body(raw);
    // str::lines accepts both CRLF and LF
    let mut lines = head.lines();
    let start_line = lines.next().unwrap_or_default().trim().to_string();

    Message {
        start_line,
        headers: parse_header_lines(lines),
        body: body.to_string(),
    }
}

/// Parse a datagram, replacing invalid UTF-8 sequences
pub fn parse_bytes(data: &[u8]) -> Message {
    parse_message(&String::from_utf8_lossy(data))
}
