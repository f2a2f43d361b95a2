//! Report Agent: one request at a time, match → run → download.
//!
//! Submodules:
//! - `generation`: output filenames and streaming the download to disk
//! - `console`: one-shot and interactive front ends over a `ReportAgent`
//! - `errors`: user-facing error kinds
//!
//! The agent borrows the long-lived service client and the catalog cache; it
//! owns neither.

pub mod console;
pub mod errors;
pub mod generation;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::Local;

use crate::catalog::CatalogCache;
use crate::matcher::{MatchResult, RequestMatcher};
use crate::service::ReportServiceClient;
pub use console::{run_loop, serve_once, DEFAULT_REQUEST, QUIT_SENTINEL};
pub use errors::AgentError;
pub use generation::ReportArtifact;

/// Output format requested when none is given.
pub const DEFAULT_OUTPUT_FORMAT: &str = "pdf";

// ─── Startup ────────────────────────────────────────────────────────────────

/// Log in, then (optionally) rebuild the catalog cache.
///
/// Returns the number of cached reports. Both failures are fatal for the
/// session: `AuthenticationFailure` and `CatalogFetchFailure`.
pub async fn start_session(
    client: &ReportServiceClient,
    cache: &mut CatalogCache,
    refresh: bool,
) -> Result<usize, AgentError> {
    client
        .authenticate()
        .await
        .map_err(|source| AgentError::AuthenticationFailure { source })?;

    let cached = if refresh {
        cache.refresh(client).await?
    } else {
        let cached = cache.len()?;
        tracing::info!(cached, "skipping catalog refresh, using persisted cache");
        cached
    };
    Ok(cached)
}

// ─── Outcome ────────────────────────────────────────────────────────────────

/// Result summary for one served request.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub report_id: String,
    pub report_name: String,
    pub parameters: BTreeMap<String, String>,
    pub artifact: ReportArtifact,
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report: {}", self.report_name)?;
        writeln!(f, "File:   {}", self.artifact.path.display())?;
        writeln!(f, "SHA256: {}", self.artifact.sha256)?;
        if self.parameters.is_empty() {
            write!(f, "Params: (none)")
        } else {
            let joined: Vec<String> = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "Params: {}", joined.join(", "))
        }
    }
}

// ─── ReportAgent ────────────────────────────────────────────────────────────

pub struct ReportAgent<'a> {
    client: &'a ReportServiceClient,
    matcher: RequestMatcher<'a>,
    output_dir: PathBuf,
    output_format: String,
}

impl<'a> ReportAgent<'a> {
    pub fn new(
        client: &'a ReportServiceClient,
        cache: &'a CatalogCache,
        output_dir: impl Into<PathBuf>,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            client,
            matcher: RequestMatcher::new(cache),
            output_dir: output_dir.into(),
            output_format: output_format.into(),
        }
    }

    /// Serve one free-text request end to end.
    pub async fn process_request(&self, request: &str) -> Result<RequestOutcome, AgentError> {
        let matched = self.matcher.match_request(request)?;
        self.generate(matched).await
    }

    /// Run the matched report and download its output.
    pub async fn generate(&self, matched: MatchResult) -> Result<RequestOutcome, AgentError> {
        let MatchResult {
            report, parameters, ..
        } = matched;

        let generation_failure = |source| AgentError::GenerationFailure {
            report_id: report.id.clone(),
            source,
        };

        let output_url = self
            .client
            .run_report(&report.id, &parameters, &self.output_format)
            .await
            .map_err(generation_failure)?;

        let response = self
            .client
            .open_download(&output_url)
            .await
            .map_err(generation_failure)?;

        let dest = generation::unique_output_path(
            &self.output_dir,
            &report.id,
            &self.output_format,
            &Local::now(),
        );
        let artifact = generation::save_download(response, &report.id, &dest).await?;

        Ok(RequestOutcome {
            report_id: report.id,
            report_name: report.name,
            parameters,
            artifact,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
