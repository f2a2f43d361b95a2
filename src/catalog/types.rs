//! Cached report metadata.

use crate::service::CatalogItem;

/// Locally cached summary of one report in the service catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDescriptor {
    /// Store ID assigned by the service. Unique within the cache.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Folder path in the content store.
    pub path: String,
    /// Free-text description, empty when the service has none.
    pub description: String,
    /// Accepted prompt parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// Last-modified timestamp as delivered by the service (opaque string).
    pub last_modified: String,
}

impl ReportDescriptor {
    /// Whether `needle` (already lower-cased) occurs in the name, description
    /// or path, ignoring case.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.path.to_lowercase().contains(needle)
    }

    /// Name and description concatenated and lower-cased, the text that
    /// request words are scored against.
    pub fn scoring_text(&self) -> String {
        format!("{}{}", self.name, self.description).to_lowercase()
    }
}

impl From<CatalogItem> for ReportDescriptor {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            path: item.path,
            description: item.description.unwrap_or_default(),
            // The search endpoint does not list prompts.
            parameters: Vec::new(),
            last_modified: item.last_modified.unwrap_or_default(),
        }
    }
}
