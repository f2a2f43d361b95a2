//! Naming and writing downloaded report outputs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use futures::StreamExt;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use super::errors::AgentError;
use crate::service::ServiceError;

/// Number of report-ID characters kept in output filenames.
const ID_PREFIX_LEN: usize = 8;

/// A report output saved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lower-case hex SHA-256 of the file contents.
    pub sha256: String,
}

/// `report_<first 8 chars of id>_<YYYYMMDDHHMMSS>.<format>`
///
/// Characters other than ASCII letters, digits, `-` and `_` are replaced with
/// `_`, so a store ID can never name a path outside the output directory.
pub fn output_filename<Tz: TimeZone>(report_id: &str, format: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let prefix: String = report_id
        .chars()
        .take(ID_PREFIX_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("report_{prefix}_{}.{format}", at.format("%Y%m%d%H%M%S"))
}

/// First path in `dir` for this report and second that does not exist yet.
///
/// Two runs of the same report within one second get `_1`, `_2`, … suffixes.
pub fn unique_output_path<Tz: TimeZone>(
    dir: &Path,
    report_id: &str,
    format: &str,
    at: &DateTime<Tz>,
) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let base = dir.join(output_filename(report_id, format, at));
    if !base.exists() {
        return base;
    }
    let stem = output_filename(report_id, "", at);
    let stem = stem.trim_end_matches('.');
    (1..)
        .map(|n| dir.join(format!("{stem}_{n}.{format}")))
        .find(|p| !p.exists())
        .unwrap_or(base)
}

/// Stream a download response body into `dest`, hashing as it goes.
///
/// A download that fails part-way leaves no file behind.
pub async fn save_download(
    response: reqwest::Response,
    report_id: &str,
    dest: &Path,
) -> Result<ReportArtifact, AgentError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(dest, e))?;
    }
    let file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| io_error(dest, e))?;

    let (size_bytes, sha256) = match write_body(response, report_id, dest, file).await {
        Ok(written) => written,
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(dest).await {
                tracing::warn!(path = %dest.display(), error = %cleanup, "failed to remove partial download");
            }
            tracing::warn!(report_id, path = %dest.display(), error = %e, "download aborted");
            return Err(e);
        }
    };

    tracing::info!(
        path = %dest.display(),
        size_bytes,
        sha256 = %sha256,
        "report output saved"
    );

    Ok(ReportArtifact {
        path: dest.to_path_buf(),
        size_bytes,
        sha256,
    })
}

/// Copy the response body into `file`. Returns the byte count and hex digest.
async fn write_body(
    response: reqwest::Response,
    report_id: &str,
    dest: &Path,
    mut file: tokio::fs::File,
) -> Result<(u64, String), AgentError> {
    let source_url = response.url().to_string();
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut size_bytes: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AgentError::GenerationFailure {
            report_id: report_id.to_string(),
            source: ServiceError::ConnectionFailed {
                endpoint: source_url.clone(),
                reason: format!("download stream error: {e}"),
            },
        })?;
        file.write_all(&chunk).await.map_err(|e| io_error(dest, e))?;
        hasher.update(&chunk);
        size_bytes += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| io_error(dest, e))?;

    Ok((size_bytes, hex_digest(&hasher.finalize())))
}

fn io_error(path: &Path, e: std::io::Error) -> AgentError {
    AgentError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubResponse, StubServer};
    use chrono::{Local, Utc};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 5, 9).unwrap()
    }

    #[test]
    fn test_output_filename_pattern() {
        let name = output_filename("abcdef1234567890", "pdf", &fixed_time());
        assert_eq!(name, "report_abcdef12_20241231230509.pdf");
    }

    #[test]
    fn test_output_filename_with_local_clock() {
        let name = output_filename("abcdef1234567890", "pdf", &Local::now());
        let stamp = name
            .strip_prefix("report_abcdef12_")
            .and_then(|rest| rest.strip_suffix(".pdf"))
            .unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_output_filename_short_id() {
        assert_eq!(
            output_filename("ab", "xlsx", &fixed_time()),
            "report_ab_20241231230509.xlsx"
        );
    }

    #[test]
    fn test_unique_output_path_adds_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = unique_output_path(dir.path(), "abcdef1234", "pdf", &fixed_time());
        assert_eq!(
            first.file_name().unwrap(),
            "report_abcdef12_20241231230509.pdf"
        );
        std::fs::write(&first, b"x").unwrap();

        let second = unique_output_path(dir.path(), "abcdef1234", "pdf", &fixed_time());
        assert_eq!(
            second.file_name().unwrap(),
            "report_abcdef12_20241231230509_1.pdf"
        );
    }

    #[test]
    fn test_hex_digest_of_empty_input() {
        let digest = hex_digest(&Sha256::digest(b""));
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_output_filename_neutralizes_path_characters() {
        let name = output_filename("a/../../x", "pdf", &fixed_time());
        assert_eq!(name, "report_a________20241231230509.pdf");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));

        let name = output_filename("..\\..\\evil", "pdf", &fixed_time());
        assert!(!name.contains('\\'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_unique_output_path_stays_in_output_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = unique_output_path(dir.path(), "../../etc/passwd", "pdf", &fixed_time());
        assert_eq!(path.parent().unwrap(), dir.path());
    }

    #[tokio::test]
    async fn test_save_download_writes_and_hashes() {
        let server =
            StubServer::start(vec![("/v1/outputs/1", StubResponse::bytes(200, b""))]).await;
        let response = reqwest::get(format!("{}/v1/outputs/1", server.base_url()))
            .await
            .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("nested").join("report_r1.pdf");
        let artifact = save_download(response, "r1", &dest).await.unwrap();

        assert_eq!(artifact.path, dest);
        assert_eq!(artifact.size_bytes, 0);
        assert_eq!(
            artifact.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_save_download_truncated_body_leaves_no_file() {
        let server = StubServer::start(vec![(
            "/v1/outputs/1",
            StubResponse::bytes(200, b"%PDF-1.7 p").with_declared_length(1000),
        )])
        .await;
        let response = reqwest::get(format!("{}/v1/outputs/1", server.base_url()))
            .await
            .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("report_abcdef12_20241231230509.pdf");
        let err = save_download(response, "abcdef1234567890", &dest)
            .await
            .unwrap_err();

        match err {
            AgentError::GenerationFailure { report_id, source } => {
                assert_eq!(report_id, "abcdef1234567890");
                assert!(matches!(source, ServiceError::ConnectionFailed { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
