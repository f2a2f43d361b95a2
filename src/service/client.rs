//! Cognos Analytics REST client.
//!
//! One `ReportServiceClient` lives for the whole process. It owns the cookie
//! jar that carries the authenticated session, so every call after
//! [`ReportServiceClient::authenticate`] runs as the logged-in user.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::ServiceConfig;
use super::errors::ServiceError;
use super::types::{
    AuthorizeRequest, CatalogItem, RunRequest, RunResponse, SearchRequest, SearchResponse,
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total request timeout for API calls (login, search, run).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Total request timeout for downloading report output.
///
/// Large PDF/XLSX outputs are streamed and can take minutes on slow tenants.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

// ─── ReportServiceClient ─────────────────────────────────────────────────────

/// Session-holding client for the reporting service.
pub struct ReportServiceClient {
    /// HTTP client for API calls.
    http: HttpClient,
    /// HTTP client for output downloads (longer timeout, same cookie jar).
    http_download: HttpClient,
    config: ServiceConfig,
}

impl ReportServiceClient {
    /// Build a client. Does NOT contact the service; call `authenticate` next.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let jar = Arc::new(Jar::default());

        let http = HttpClient::builder()
            .cookie_provider(jar.clone())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::ConnectionFailed {
                endpoint: config.base_url().to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let http_download = HttpClient::builder()
            .cookie_provider(jar)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::ConnectionFailed {
                endpoint: config.base_url().to_string(),
                reason: format!("failed to build download HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            http_download,
            config,
        })
    }

    // ─── Session ─────────────────────────────────────────────────────────

    /// Log in with the configured credentials.
    ///
    /// The service answers with session cookies, which the shared jar keeps
    /// for every later request.
    pub async fn authenticate(&self) -> Result<(), ServiceError> {
        let url = self.config.endpoint("/v1/authorize");
        let body = AuthorizeRequest::new(self.config.username(), self.config.password());

        let response = self.post_json(&url, &body).await?;
        check_status(response, &url).await?;

        tracing::info!(
            base_url = %self.config.base_url(),
            user = %self.config.username(),
            "authenticated with reporting service"
        );
        Ok(())
    }

    // ─── Catalog ─────────────────────────────────────────────────────────

    /// Fetch every report in the catalog via the search endpoint.
    pub async fn search_catalog(&self) -> Result<Vec<CatalogItem>, ServiceError> {
        let url = self.config.endpoint("/api/v1/search");
        let response = self.post_json(&url, &SearchRequest::all_reports()).await?;
        let response = check_status(response, &url).await?;
        let parsed: SearchResponse = read_json(response, &url).await?;

        tracing::debug!(count = parsed.results.len(), "catalog search returned");
        Ok(parsed.results)
    }

    // ─── Generation ──────────────────────────────────────────────────────

    /// Start a report run and return the absolute URL of its output.
    pub async fn run_report(
        &self,
        report_id: &str,
        parameters: &BTreeMap<String, String>,
        output_format: &str,
    ) -> Result<String, ServiceError> {
        let url = self.config.endpoint(&format!("/v1/reports/{report_id}/runs"));
        let body = RunRequest::new(parameters, output_format);

        tracing::info!(
            report_id,
            output_format,
            param_count = parameters.len(),
            "starting report run"
        );

        let response = self.post_json(&url, &body).await?;
        let response = check_status(response, &url).await?;
        let run: RunResponse = read_json(response, &url).await?;

        Ok(self.resolve_output_url(&run.output.url))
    }

    /// Open a streaming GET on a report output URL.
    ///
    /// The caller consumes the body (see `agent::generation`).
    pub async fn open_download(&self, output_url: &str) -> Result<Response, ServiceError> {
        let response = self
            .http_download
            .get(output_url)
            .send()
            .await
            .map_err(|e| map_send_error(e, output_url, DOWNLOAD_TIMEOUT))?;
        check_status(response, output_url).await
    }

    /// Output URLs may come back relative to the service root.
    fn resolve_output_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            self.config.endpoint(url)
        } else {
            self.config.endpoint(&format!("/{url}"))
        }
    }

    async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<Response, ServiceError> {
        self.http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(e, url, REQUEST_TIMEOUT))
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn map_send_error(e: reqwest::Error, url: &str, timeout: Duration) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout {
            endpoint: url.to_string(),
            duration_secs: timeout.as_secs(),
        }
    } else {
        ServiceError::ConnectionFailed {
            endpoint: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Turn a non-2xx response into `ServiceError::HttpError`.
async fn check_status(response: Response, url: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(url, status = status.as_u16(), "reporting service returned error");
    Err(ServiceError::HttpError {
        endpoint: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ServiceError> {
    let text = response
        .text()
        .await
        .map_err(|e| ServiceError::MalformedResponse {
            endpoint: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;
    serde_json::from_str(&text).map_err(|e| ServiceError::MalformedResponse {
        endpoint: url.to_string(),
        reason: e.to_string(),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
