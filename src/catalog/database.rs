//! SQLite-backed snapshot of the report catalog.
//!
//! Uses `rusqlite` in synchronous mode. The table is truncated and rebuilt
//! wholesale on every refresh and only read afterwards.

use rusqlite::{params, Connection};

use super::errors::CatalogError;
use super::types::ReportDescriptor;
use crate::service::ReportServiceClient;

// ─── CatalogCache ───────────────────────────────────────────────────────────

/// Local lookup of report descriptors keyed by store ID.
pub struct CatalogCache {
    conn: Connection,
}

impl CatalogCache {
    /// Open (or create) the cache database at the given path.
    ///
    /// Pass `":memory:"` for an in-memory database (tests).
    pub fn open(path: &str) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let cache = Self { conn };
        cache.create_tables()?;
        Ok(cache)
    }

    fn create_tables(&self) -> Result<(), CatalogError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS reports (
                store_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                path TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                parameters TEXT NOT NULL DEFAULT '[]',
                last_modified TEXT NOT NULL DEFAULT ''
            );
            ",
        )?;
        Ok(())
    }

    // ─── Refresh ────────────────────────────────────────────────────────

    /// Re-fetch the full catalog from the service and replace the cache.
    ///
    /// Upstream failures are returned as `CatalogError::FetchFailed` and leave
    /// the previous snapshot untouched.
    pub async fn refresh(&mut self, client: &ReportServiceClient) -> Result<usize, CatalogError> {
        let items = client.search_catalog().await?;
        let reports: Vec<ReportDescriptor> =
            items.into_iter().map(ReportDescriptor::from).collect();
        let cached = self.replace_all(&reports)?;
        tracing::info!(fetched = reports.len(), cached, "catalog cache refreshed");
        Ok(cached)
    }

    /// Truncate the table and insert `reports` in one transaction.
    ///
    /// A later entry with an already-seen ID overwrites the earlier one.
    /// Returns the number of distinct entries now cached.
    pub fn replace_all(&mut self, reports: &[ReportDescriptor]) -> Result<usize, CatalogError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM reports", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO reports
                 (store_id, name, path, description, parameters, last_modified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for report in reports {
                let parameters_json = serde_json::to_string(&report.parameters)?;
                stmt.execute(params![
                    report.id,
                    report.name,
                    report.path,
                    report.description,
                    parameters_json,
                    report.last_modified,
                ])?;
            }
        }
        tx.commit()?;
        self.len()
    }

    // ─── Lookup ─────────────────────────────────────────────────────────

    /// Every cached descriptor, in insertion order.
    pub fn all(&self) -> Result<Vec<ReportDescriptor>, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT store_id, name, path, description, parameters, last_modified
             FROM reports
             ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], row_to_descriptor)?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(row?);
        }
        Ok(reports)
    }

    /// Descriptors whose name, description or path contains `substring`,
    /// ignoring case. The empty string matches everything.
    ///
    /// A full scan, filtered in Rust so case folding is Unicode-aware and
    /// `%`/`_` in the query are taken literally.
    pub fn find(&self, substring: &str) -> Result<Vec<ReportDescriptor>, CatalogError> {
        let needle = substring.to_lowercase();
        let matches: Vec<ReportDescriptor> = self
            .all()?
            .into_iter()
            .filter(|r| r.contains_lowercase(&needle))
            .collect();
        tracing::debug!(query = substring, matches = matches.len(), "catalog find");
        Ok(matches)
    }

    /// Number of cached reports.
    pub fn len(&self) -> Result<usize, CatalogError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Build a descriptor from a `reports` row, column by column.
fn row_to_descriptor(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportDescriptor> {
    Ok(ReportDescriptor {
        id: row.get("store_id")?,
        name: row.get("name")?,
        path: row.get("path")?,
        description: row.get("description")?,
        parameters: parse_json_array(row.get::<_, String>("parameters")?),
        last_modified: row.get("last_modified")?,
    })
}

/// Parse a JSON string into a Vec<String>, defaulting to empty.
fn parse_json_array(json: String) -> Vec<String> {
    serde_json::from_str(&json).unwrap_or_default()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
