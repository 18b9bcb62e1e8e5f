//! Errors raised by the HTTP client adapter.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered 401; stored credentials have been cleared.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    /// The backend answered with any other non-2xx status.
    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// A 2xx body that did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response from its status and raw body.
    /// The message is taken from the body's `message` field when present.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { message }
        } else {
            Self::Status {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// The message the backend attached to the failure, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
