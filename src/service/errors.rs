//! Reporting-service error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Structured logging
//! is the caller's responsibility; these types carry the context needed to build
//! meaningful log entries.

use thiserror::Error;

/// Errors that can occur while talking to the reporting service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// TCP/HTTP connection to the service failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// The service did not respond within the configured timeout.
    #[error("request to {endpoint} timed out after {duration_secs}s")]
    Timeout { endpoint: String, duration_secs: u64 },

    /// Non-2xx HTTP response from the service.
    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but the body did not have the expected shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Configuration loading or validation error.
    #[error("config error: {reason}")]
    ConfigError { reason: String },
}

impl ServiceError {
    /// HTTP status code, if this is an `HttpError`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service rejected the session's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
