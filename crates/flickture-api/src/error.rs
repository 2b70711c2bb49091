use thiserror::Error;

use crate::message;
use crate::request::ApiResponse;

/// Outcome of a request through the pipeline.
pub type ApiResult = Result<ApiResponse, ApiError>;

/// Why no response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connection failed"),
            Self::Other => write!(f, "no response"),
        }
    }
}

/// A failure where the server never answered.
///
/// Holds a rendered message instead of the underlying `reqwest::Error` so it
/// can be cloned to every caller sharing a de-duplicated request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Connect,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_connect() {
            Self::connect(err.to_string())
        } else {
            Self::other(err.to_string())
        }
    }
}

/// Errors from the API client.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("client setup error: {0}")]
    Setup(String),

    /// Rejected locally before anything was sent.
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("credential store error: {0}")]
    Credentials(String),
}

impl From<flickture_core::error::CoreError> for ApiError {
    fn from(err: flickture_core::error::CoreError) -> Self {
        Self::Credentials(err.to_string())
    }
}

impl ApiError {
    /// No response was received, so the request may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status of a received error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Network and HTTP failures are shown to the user. Integration bugs
    /// (bad URL, payload that won't serialize or parse) only propagate.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Short message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) => message::transport_message(err.kind).to_string(),
            Self::Status { status, body } => message::status_message(*status, body),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_transient() {
        assert!(ApiError::from(TransportError::timeout("slow")).is_transient());
        assert!(ApiError::from(TransportError::connect("refused")).is_transient());
        assert!(ApiError::from(TransportError::other("reset")).is_transient());
    }

    #[test]
    fn test_status_errors_are_not_transient() {
        let err = ApiError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unauthorized());
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_unauthorized() {
        let err = ApiError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_programmer_errors_not_user_facing() {
        assert!(!ApiError::Parse("bad".into()).is_user_facing());
        assert!(!ApiError::Serialize("bad".into()).is_user_facing());
        assert!(!ApiError::InvalidUrl("bad".into()).is_user_facing());
    }
}
