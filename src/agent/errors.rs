//! Agent-level error types.
//!
//! One variant per failure kind a user can observe. Startup failures
//! (authentication, catalog fetch) are fatal; `NoMatchFound` is not.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::matcher::MatchError;
use crate::service::ServiceError;

/// Errors that can occur while serving report requests.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Login to the reporting service failed.
    #[error("authentication failed: {source}")]
    AuthenticationFailure { source: ServiceError },

    /// The catalog could not be fetched at startup.
    #[error("catalog fetch failed: {source}")]
    CatalogFetchFailure { source: ServiceError },

    /// No cached report matched the request.
    #[error("no reports found for '{request}'")]
    NoMatchFound { request: String },

    /// Running the report or downloading its output failed.
    #[error("generation of report '{report_id}' failed: {source}")]
    GenerationFailure {
        report_id: String,
        source: ServiceError,
    },

    /// Local cache database error.
    #[error("catalog cache error: {0}")]
    Cache(CatalogError),

    /// Writing the downloaded output failed.
    #[error("failed to write {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// Reading requests or writing results on the console failed.
    #[error("console I/O error: {reason}")]
    Console { reason: String },
}

impl AgentError {
    /// Whether the current session can keep serving requests after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::NoMatchFound { .. }
                | AgentError::GenerationFailure { .. }
                | AgentError::Io { .. }
        )
    }
}

impl From<CatalogError> for AgentError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::FetchFailed(source) => AgentError::CatalogFetchFailure { source },
            other => AgentError::Cache(other),
        }
    }
}

impl From<std::io::Error> for AgentError {
    fn from(e: std::io::Error) -> Self {
        AgentError::Console {
            reason: e.to_string(),
        }
    }
}

impl From<MatchError> for AgentError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::NoMatchFound { request } => AgentError::NoMatchFound { request },
            MatchError::Catalog(inner) => inner.into(),
        }
    }
}
