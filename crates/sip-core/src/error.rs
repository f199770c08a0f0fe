//! Error types for siprec-sip-core

use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while interpreting SIP text, multipart bodies and SDP.
///
/// Raw message parsing never produces these: it degrades to a best-effort
/// [`Message`](crate::Message). They appear when a caller asks for a piece
/// of the message that is missing or cannot be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Start-line or a required header is absent or unparsable
    #[error("Malformed SIP message: {0}")]
    MalformedMessage(String),

    /// Content-Type carries no usable `boundary` parameter
    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    /// An SDP line could not be interpreted
    #[error("SDP parsing error: {0}")]
    SdpParsing(String),
}

impl Error {
    pub fn malformed_message(message: impl Into<String>) -> Self {
        Error::MalformedMessage(message.into())
    }

    pub fn malformed_multipart(message: impl Into<String>) -> Self {
        Error::MalformedMultipart(message.into())
    }
}
