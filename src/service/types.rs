//! Wire types for the Cognos Analytics REST endpoints.
//!
//! Only the fields this crate reads are modelled; unknown fields in responses
//! are ignored by serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CAM namespace used for username/password logins.
pub const CAM_NAMESPACE: &str = "cognos";

/// Maximum number of catalog entries requested per search.
pub const CATALOG_PAGE_SIZE: u32 = 1000;

// ─── Requests ────────────────────────────────────────────────────────────────

/// A `{"name": ..., "value": ...}` pair, used by both login and report runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body of `POST /v1/authorize`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    #[serde(rename = "CAMNamespace")]
    pub cam_namespace: String,
    pub parameters: Vec<NamedValue>,
}

impl AuthorizeRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            cam_namespace: CAM_NAMESPACE.to_string(),
            parameters: vec![
                NamedValue::new("userId", username),
                NamedValue::new("password", password),
            ],
        }
    }
}

/// Body of `POST /api/v1/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: SearchQuery,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search_text: String,
    pub object_types: Vec<String>,
}

impl SearchRequest {
    /// Wildcard search over every object of type `report`.
    pub fn all_reports() -> Self {
        Self {
            query: SearchQuery {
                search_text: "*".to_string(),
                object_types: vec!["report".to_string()],
            },
            count: CATALOG_PAGE_SIZE,
        }
    }
}

/// Body of `POST /v1/reports/{id}/runs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub parameters: Vec<NamedValue>,
    pub output_format: String,
}

impl RunRequest {
    pub fn new(parameters: &BTreeMap<String, String>, output_format: &str) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|(k, v)| NamedValue::new(k.as_str(), v.as_str()))
                .collect(),
            output_format: output_format.to_string(),
        }
    }
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Response of `POST /api/v1/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

/// One catalog entry as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// Response of `POST /v1/reports/{id}/runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunResponse {
    pub output: RunOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunOutput {
    pub url: String,
}
