//! Answering service error types

use thiserror::Error;

/// Failed call to the answering backend, with classification.
///
/// Every kind collapses into the same fallback turn; the kind and
/// message only feed logs.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AnswerError {
    pub kind: AnswerErrorKind,
    pub message: String,
    /// HTTP status for [`AnswerErrorKind::Status`]
    pub status: Option<u16>,
}

impl AnswerError {
    pub fn new(kind: AnswerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Timeout, message)
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: AnswerErrorKind::Status,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerErrorKind {
    /// Connection refused, DNS, reset
    Network,
    /// No response within the configured timeout
    Timeout,
    /// Non-2xx status code
    Status,
    /// Body is not a well-formed answer
    Malformed,
    Unknown,
}

impl AnswerErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Status => "status",
            Self::Malformed => "malformed",
            Self::Unknown => "unknown",
        }
    }
}
