//! Client error types.

use crate::config::ConfigError;

/// Errors from outbound HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (DNS, connect, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The remote answered with a status other than the expected one.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body could not be read.
    #[error("failed to read response body from {endpoint}: {source}")]
    Body {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Status`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
