//! Client error types
//!
//! Every failure path of the dashboard resolves to one of these. Request
//! errors carry the message the server put in its error body, if any, so
//! the panels can show it instead of a generic fallback.

use thiserror::Error;

use crate::session::SessionError;

/// Errors produced by the API client and the dashboard panels
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Server answered with a non-success status
    #[error("Request failed with status code {status}")]
    Http { status: u16, message: Option<String> },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected payload
    #[error("Decode error: {0}")]
    Decode(String),

    /// Token storage failed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Local file access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The same action is already running
    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl ClientError {
    /// Message supplied by the server in the error body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the server's message when present, the
    /// fallback for bare HTTP failures, the error text otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Http { message: Some(m), .. } => m.clone(),
            ClientError::Http { message: None, .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: None,
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Pull the human-readable message out of an error response body.
///
/// The API reports failures as `{"error": "..."}`; framework-level failures
/// (404, auth) use `{"detail": "..."}`. Anything else yields `None`.
pub fn extract_server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "detail"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str().map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}
