//! API gateway error types.

use thiserror::Error;

/// Errors returned by [`MoiraClient`](crate::MoiraClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// Renders as the server-supplied message and nothing else.
    #[error("{message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Message from the `{"error": ...}` envelope, or the raw body.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The base URL cannot carry a path.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// A default header name or value was rejected.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ApiError {
    /// HTTP status of a remote error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for gateway calls.
pub type Result<T> = std::result::Result<T, ApiError>;
