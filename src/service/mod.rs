//! Reporting Service: client for the Cognos Analytics REST API.
//!
//! - `client`: session-holding HTTP client (login, catalog search, runs, downloads)
//! - `config`: validated connection settings
//! - `types`: request/response wire types
//! - `errors`: service error type
//!
//! Everything here is a thin boundary: no retries, no fallback. A failed call
//! fails the operation that made it.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-exports for convenience
pub use client::ReportServiceClient;
pub use config::{ServiceConfig, DEFAULT_BASE_URL};
pub use errors::ServiceError;
pub use types::CatalogItem;
