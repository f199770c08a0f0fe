//! # multipart/mixed Bodies
//!
//! A SIPREC INVITE carries two bodies in one MIME envelope
//! ([RFC 7866 Section 8](https://datatracker.ietf.org/doc/html/rfc7866#section-8)):
//! the SDP offer describing the streams to record and the recording metadata XML.
//!
//! ```text
//! Content-Type: multipart/mixed;boundary=uniqueBoundary
//!
//! --uniqueBoundary
//! Content-Type: application/sdp
//!
//! v=0
//! ...
//! --uniqueBoundary
//! Content-Type: application/rs-metadata+xml
//!
//! <?xml version="1.0" encoding="UTF-8"?>
//! ...
//! --uniqueBoundary--
//! ```
//!
//! [`MultipartBody::parse`] splits the envelope into [`Part`]s;
//! [`MultipartBody::extract`] keeps only the two kinds the recorder understands.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::{parse_header_lines, split_head_body};
use super::headers::Headers;

/// MIME type of an SDP body
pub const APPLICATION_SDP: &str = "application/sdp";
/// MIME type of SIPREC recording metadata
pub const APPLICATION_RS_METADATA: &str = "application/rs-metadata+xml";

/// The part kinds a recording session cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyKind {
    Sdp,
    RecordingMetadata,
}

impl BodyKind {
    /// Classify a Content-Type value; parameters after `;` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(APPLICATION_SDP) {
            Some(BodyKind::Sdp)
        } else if essence.eq_ignore_ascii_case(APPLICATION_RS_METADATA) {
            Some(BodyKind::RecordingMetadata)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            BodyKind::Sdp => APPLICATION_SDP,
            BodyKind::RecordingMetadata => APPLICATION_RS_METADATA,
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// One body part: its own headers and its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub headers: Headers,
    pub body: String,
}

impl Part {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    pub fn kind(&self) -> Option<BodyKind> {
        self.content_type().and_then(BodyKind::from_content_type)
    }
}

/// A parsed multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub boundary: String,
    pub parts: Vec<Part>,
}

/// Read the `boundary` parameter from a Content-Type value.
///
/// The parameter name must be exactly `boundary` (any case); the value may be quoted.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let value = content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim().eq_ignore_ascii_case("boundary").then(|| value.trim())
    })?;

    let boundary = match value.strip_prefix('"') {
        // A quoted boundary may itself contain ';', so read it from the raw text
        Some(_) => quoted_boundary(content_type)?,
        None => value
            .split(|c: char| c == ',' || c.is_whitespace())
            .next()
            .unwrap_or_default(),
    };

    if boundary.is_empty() {
        None
    } else {
        Some(boundary.to_string())
    }
}

// The quoted value following the exact `boundary` parameter name
fn quoted_boundary(content_type: &str) -> Option<&str> {
    let mut rest = content_type;
    while let Some(at) = rest.find(';') {
        rest = &rest[at + 1..];
        let Some((name, value)) = rest.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("boundary") {
            let quoted = value.trim_start().strip_prefix('"')?;
            return quoted.split('"').next();
        }
    }
    None
}

impl MultipartBody {
    /// Split `body` using the boundary announced in `content_type`.
    ///
    /// Fails with [`Error::MalformedMultipart`] only when the Content-Type has
    /// no boundary. Segments without content, the preamble and the closing
    /// `--boundary--` delimiter produce no part.
    pub fn parse(body: &str, content_type: &str) -> Result<Self> {
        let boundary = boundary_from_content_type(content_type).ok_or_else(|| {
            Error::malformed_multipart(format!("No boundary in Content-Type '{}'", content_type))
        })?;
        let delimiter = format!("--{}", boundary);

        let mut parts = Vec::new();
        // Anything before the first delimiter is preamble
        for segment in body.split(delimiter.as_str()).skip(1) {
            let segment = segment
                .strip_prefix("\r\n")
                .or_else(|| segment.strip_prefix('\n'))
                .unwrap_or(segment);

            if segment.trim().is_empty() || segment.starts_with("--") {
                continue;
            }

            // A part with no headers starts straight away with the blank line
            let (header_block, content) = if segment.starts_with("\r\n") || segment.starts_with('\n') {
                ("", segment)
            } else {
                split_head_body(segment)
            };

            let content = content.trim();
            if content.is_empty() {
                trace!("Skipping multipart segment without content");
                continue;
            }

            parts.push(Part {
                headers: parse_header_lines(header_block.lines()),
                body: content.to_string(),
            });
        }

        Ok(MultipartBody { boundary, parts })
    }

    /// Bodies of the recognized parts keyed by kind; other parts are dropped.
    ///
    /// If a kind appears twice the later part wins.
    pub fn extract(&self) -> BTreeMap<BodyKind, String> {
        self.parts
            .iter()
            .filter_map(|part| part.kind().map(|kind| (kind, part.body.clone())))
            .collect()
    }

    /// The last part of the given kind
    pub fn part(&self, kind: BodyKind) -> Option<&Part> {
        self.parts.iter().rev().find(|p| p.kind() == Some(kind))
    }
}

/// Parse and extract in one step
pub fn extract_parts(body: &str, content_type: &str) -> Result<BTreeMap<BodyKind, String>> {
    Ok(MultipartBody::parse(body, content_type)?.extract())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "--B\r\n\
        Content-Type: application/sdp\r\n\
        \r\n\
        v=0\r\n\
        m=audio 8000 RTP/AVP 0\r\n\
        \r\n\
        --B\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        ignored\r\n\
        --B\r\n\
        Content-Type: application/rs-metadata+xml\r\n\
        Content-Disposition: recording-session\r\n\
        \r\n\
        <recording/>\r\n\
        \r\n\
        --B--\r\n";

    #[test]
    fn test_boundary_quoted_and_unquoted() {
        assert_eq!(boundary_from_content_type("multipart/mixed;boundary=abc"), Some("abc".into()));
        assert_eq!(
            boundary_from_content_type("multipart/mixed; Boundary=\"a b;c\"; x=y"),
            Some("a b;c".into())
        );
        assert_eq!(boundary_from_content_type("multipart/mixed;boundary=abc;x=1"), Some("abc".into()));
        assert_eq!(boundary_from_content_type("multipart/mixed"), None);
        assert_eq!(
            boundary_from_content_type("multipart/mixed; x-boundary=foo; boundary=bar"),
            Some("bar".into())
        );
        assert_eq!(boundary_from_content_type("multipart/mixed; x-boundary=foo"), None);
        assert_eq!(boundary_from_content_type("multipart/mixed;boundary=\"\""), None);
    }

    #[test]
    fn test_parse_keeps_every_part_and_extract_filters() {
        let multipart = MultipartBody::parse(BODY, "multipart/mixed;boundary=B").unwrap();
        assert_eq!(multipart.boundary, "B");
        assert_eq!(multipart.parts.len(), 3);
        assert_eq!(multipart.parts[1].body, "ignored");

        let extracted = multipart.extract();
        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[&BodyKind::Sdp], "v=0\r\nm=audio 8000 RTP/AVP 0");
        assert_eq!(extracted[&BodyKind::RecordingMetadata], "<recording/>");
        assert_eq!(
            multipart.part(BodyKind::RecordingMetadata).unwrap().headers.get("Content-Disposition"),
            Some("recording-session")
        );
    }

    #[test]
    fn test_missing_boundary_is_an_error() {
        let err = MultipartBody::parse(BODY, "application/sdp").unwrap_err();
        assert!(matches!(err, Error::MalformedMultipart(_)));
    }

    #[test]
    fn test_closing_delimiter_yields_no_part() {
        let multipart = MultipartBody::parse("--X--\r\n", "multipart/mixed;boundary=X").unwrap();
        assert!(multipart.parts.is_empty());
    }

    #[test]
    fn test_part_without_headers() {
        let multipart = MultipartBody::parse("--X\r\n\r\nhello\r\n--X--", "multipart/mixed;boundary=X").unwrap();
        assert_eq!(multipart.parts.len(), 1);
        assert!(multipart.parts[0].headers.is_empty());
        assert_eq!(multipart.parts[0].kind(), None);
    }
}
