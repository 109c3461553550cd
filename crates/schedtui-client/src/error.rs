#![forbid(unsafe_code)]

//! Error taxonomy for remote engine calls.
//!
//! Three failure classes exist at a call site:
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | [`ApiError::Transport`] | the call never completed (network, DNS, timeout) | surfaced as one notification |
//! | [`ApiError::Rejected`] | non-success status with a structured `error` body | server text shown verbatim when present |
//! | [`ApiError::Decode`] | success status but an unreadable payload | surfaced as one notification |
//!
//! A success payload with *missing fields* is not an error: the
//! statistics presenter substitutes defaults per field. None of these
//! propagate past the initiating action, and none are fatal.

use std::fmt;

/// Result type for engine calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// A failed remote engine call.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not complete at the transport level.
    Transport(reqwest::Error),
    /// The engine returned a non-success status.
    ///
    /// `message` is the structured `error` text from the body, empty
    /// when the engine supplied none.
    Rejected { status: u16, message: String },
    /// A success status carried a payload that failed to decode.
    Decode(serde_json::Error),
}

impl ApiError {
    /// The operator-facing message for this failure.
    ///
    /// A rejected request with server-provided error text shows that
    /// text verbatim; everything else falls back to the per-action
    /// `fallback`.
    #[must_use]
    pub fn operator_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// Whether the engine itself rejected the request (as opposed to
    /// the call never arriving or the payload being unreadable).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure: {e}"),
            Self::Rejected { status, message } if message.is_empty() => {
                write!(f, "request rejected with status {status}")
            }
            Self::Rejected { status, message } => {
                write!(f, "request rejected with status {status}: {message}")
            }
            Self::Decode(e) => write!(f, "malformed response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Rejected { .. } => None,
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}
