// SDP data types

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::Error;

/// Attribute name under which flag-only attributes (`a=recvonly`) are collected
pub const FLAGS_ATTRIBUTE: &str = "flags";

const DIRECTIONS: [&str; 4] = ["sendrecv", "sendonly", "recvonly", "inactive"];

/// Session-level fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    /// `v=`
    pub version: Option<String>,
    /// `o=`
    pub origin: Option<String>,
    /// `s=`
    pub name: Option<String>,
    /// `c=` seen before the first `m=` line
    pub connection: Option<String>,
    /// `t=`
    pub timing: Option<String>,
    /// Raw values of session-level `a=` lines
    pub attributes: Vec<String>,
}

/// One `m=` block and the lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescription {
    pub media_type: String,
    pub port: u16,
    pub protocol: String,
    /// Format tokens in offer order
    pub codecs: Vec<String>,
    pub connection: Option<String>,
    /// Named attributes other than rtpmap, fmtp and label, plus [`FLAGS_ATTRIBUTE`]
    pub attributes: IndexMap<String, Vec<String>>,
    /// Payload type to encoding, e.g. `"0" -> "PCMU/8000"`
    pub rtpmap: IndexMap<String, String>,
    /// Payload type to format parameters
    pub fmtp: IndexMap<String, String>,
    pub label: Option<String>,
}

impl MediaDescription {
    pub fn new(media_type: impl Into<String>, port: u16, protocol: impl Into<String>, codecs: Vec<String>) -> Self {
        Self {
            media_type: media_type.into(),
            port,
            protocol: protocol.into(),
            codecs,
            connection: None,
            attributes: IndexMap::new(),
            rtpmap: IndexMap::new(),
            fmtp: IndexMap::new(),
            label: None,
        }
    }

    /// Flag-only attributes in order of appearance
    pub fn flags(&self) -> &[String] {
        self.attributes
            .get(FLAGS_ATTRIBUTE)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The media direction flag, if one was given
    pub fn direction(&self) -> Option<&str> {
        self.flags()
            .iter()
            .map(String::as_str)
            .find(|flag| DIRECTIONS.contains(flag))
    }

    /// Values of a named attribute
    pub fn attribute(&self, name: &str) -> &[String] {
        self.attributes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A parsed session description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDescription {
    pub session: SessionInfo,
    pub media: Vec<MediaDescription>,
}

impl SessionDescription {
    /// Each media block's label, in media order
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.media.iter().map(|m| m.label.as_deref()).collect()
    }

    /// The connection address for a media block, falling back to the session level
    pub fn connection_for(&self, index: usize) -> Option<&str> {
        self.media
            .get(index)
            .and_then(|m| m.connection.as_deref())
            .or(self.session.connection.as_deref())
    }
}

impl FromStr for SessionDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_sdp(s)
    }
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.media_type, self.port, self.protocol)?;
        for codec in &self.codecs {
            write!(f, " {}", codec)?;
        }
        Ok(())
    }
}
