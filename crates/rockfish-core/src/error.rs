//! Client-observed error taxonomy.
//!
//! Every failure a channel surfaces is one `ChannelError` carrying a
//! human-readable message. Local input-validation failures never produce
//! one of these; they yield the operation's empty result instead.

use serde::{Deserialize, Serialize};

/// Classification of a channel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Transport/channel construction failed.
    Creation,
    /// The server returned an explicit application fault.
    Fault,
    /// Transport-level failure (connection refused, reset).
    Communication,
    /// The call exceeded the transport timeout.
    Timeout,
    /// Anything else.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ChannelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ChannelError {
    pub fn creation() -> Self {
        Self {
            kind: ErrorKind::Creation,
            message: "There was a problem creating the communication channel.".to_string(),
        }
    }

    /// Fault messages pass through verbatim.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Fault,
            message: message.into(),
        }
    }

    pub fn communication() -> Self {
        Self {
            kind: ErrorKind::Communication,
            message: "There was a problem communicating with the service.".to_string(),
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: "The service operation has timed out.".to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: "An unknown exception has occurred.".to_string(),
        }
    }
}
