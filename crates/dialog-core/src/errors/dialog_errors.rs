//! Dialog-level errors
//!
//! Every error here aborts only the request being processed; the dispatcher
//! logs it and keeps serving.

use thiserror::Error;

use crate::dialog::CallState;

/// Result type for dialog operations
pub type DialogResult<T> = Result<T, DialogError>;

/// Errors raised while handling calls
#[derive(Error, Debug)]
pub enum DialogError {
    /// Malformed message, multipart body or SDP
    #[error("SIP error: {0}")]
    Sip(#[from] siprec_sip_core::Error),

    /// Sending failed
    #[error("Transport error: {0}")]
    Transport(#[from] siprec_sip_transport::Error),

    /// The offer has fewer media streams than the answer must carry
    #[error("Offer has {offered} media streams but the answer needs {required}")]
    LabelIndexMismatch { required: usize, offered: usize },

    #[error("No call with Call-ID {call_id}")]
    UnknownDialog { call_id: String },

    #[error("A call with Call-ID {call_id} already exists")]
    DialogExists { call_id: String },

    #[error("Cannot apply {event} to a call in state {from}")]
    InvalidStateTransition { from: CallState, event: String },

    #[error("Missing {name} header")]
    MissingHeader { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DialogError {
    pub fn unknown_dialog(call_id: impl Into<String>) -> Self {
        Self::UnknownDialog { call_id: call_id.into() }
    }

    pub fn missing_header(name: impl Into<String>) -> Self {
        Self::MissingHeader { name: name.into() }
    }

    pub fn invalid_transition(from: CallState, event: impl Into<String>) -> Self {
        Self::InvalidStateTransition { from, event: event.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DialogError::LabelIndexMismatch { required: 2, offered: 1 };
        assert_eq!(err.to_string(), "Offer has 1 media streams but the answer needs 2");

        let err = DialogError::invalid_transition(CallState::Terminated, "ACK");
        assert_eq!(err.to_string(), "Cannot apply ACK to a call in state TERMINATED");
    }

    #[test]
    fn test_from_sip_error() {
        let err: DialogError = siprec_sip_core::Error::malformed_multipart("no boundary").into();
        assert!(matches!(err, DialogError::Sip(siprec_sip_core::Error::MalformedMultipart(_))));
    }
}
