//! Error types for inventory scans
//!
//! Everything below the binary returns [`Result`]. The only distinction the
//! enumeration pipeline relies on is [`Error::is_forbidden`], which is derived
//! from the HTTP status of a failed API call and never from message text.

use thiserror::Error;

/// HTTP status the remote APIs use to signal "not permitted"
pub const FORBIDDEN: u16 = 403;

/// Errors that can occur while enumerating resources
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with a non-success status
    #[error("request to {url} failed with status {status}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials could not produce an access token
    #[error("authentication error: {0}")]
    Auth(String),

    /// The scan scope was cancelled
    #[error("scan cancelled")]
    Cancelled,

    /// Normalized values did not match the typed schema
    #[error("cannot deserialize {resource_type}: {reason}")]
    Deserialize {
        resource_type: String,
        reason: String,
    },

    /// A listed item lacks the fields needed to identify it
    #[error("malformed listing for {resource_type}: {reason}")]
    Listing {
        resource_type: String,
        reason: String,
    },

    /// The listing API broke the paging protocol
    #[error("pagination error: {0}")]
    Pagination(String),

    /// No definition is registered for this resource type
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// A read task panicked or was aborted
    #[error("read task failed: {0}")]
    Task(String),

    /// A response body was not valid JSON
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for inventory operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Build an API error from a status code
    pub fn api(status: u16, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            url: url.into(),
            message: message.into(),
        }
    }

    /// HTTP status of a failed API call, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the API refused the call for lack of permission
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(FORBIDDEN)
    }

    /// True when the scan was aborted by request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
