//! Error types for OAuth client operations

use bytes::Bytes;

/// Errors from building the client or exchanging an authorization code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP request timed out: {0}")]
    Timeout(String),

    /// `body` holds the response bytes exactly as received.
    #[error("token endpoint returned {status}: {}", String::from_utf8_lossy(.body))]
    NonSuccessStatus { status: u16, body: Bytes },
}

impl Error {
    /// Whether the request never produced a response. Timeouts count as
    /// transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// HTTP status reported by the token endpoint, if it responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NonSuccessStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a non-200 response.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Error::NonSuccessStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

/// Result alias for OAuth client operations.
pub type Result<T> = std::result::Result<T, Error>;
