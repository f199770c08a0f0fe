use std::io;

use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the transport layer
#[derive(Error, Debug)]
pub enum Error {
    /// Socket-level failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transport has been closed
    #[error("Transport is closed")]
    TransportClosed,
}

impl Error {
    /// Whether a later send on the same transport could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::ConnectionRefused
            ),
            Error::TransportClosed => false,
        }
    }
}
