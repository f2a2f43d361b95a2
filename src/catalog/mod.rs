//! Catalog Cache: local snapshot of the reporting service's report listing.
//!
//! Submodules:
//! - `database`: SQLite table keyed by store ID, refreshed wholesale
//! - `types`: the cached `ReportDescriptor`
//! - `errors`: cache error type

pub mod database;
pub mod errors;
pub mod types;

pub use database::CatalogCache;
pub use errors::CatalogError;
pub use types::ReportDescriptor;
