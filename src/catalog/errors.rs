//! Catalog cache error types.

use thiserror::Error;

use crate::service::ServiceError;

/// Errors that can occur while refreshing or reading the catalog cache.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Database operation failed.
    #[error("database error: {reason}")]
    DatabaseError { reason: String },

    /// Stored parameter list could not be (de)serialized.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },

    /// The upstream catalog search failed.
    #[error("catalog fetch failed: {0}")]
    FetchFailed(#[from] ServiceError),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::DatabaseError {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError {
            reason: e.to_string(),
        }
    }
}
