pub mod agent;
pub mod catalog;
pub mod matcher;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::{Path, PathBuf};

/// Cache database filename inside the data directory.
pub const CACHE_DB_FILE: &str = "cognos_reports_cache.db";

/// Log filename inside the data directory.
pub const LOG_FILE: &str = "agent.log";

/// Number of rotated log generations kept next to the live log.
const LOG_GENERATIONS: u32 = 3;

/// Return the platform-standard data directory for Report Agent.
///
/// - macOS: `~/Library/Application Support/report-agent/`
/// - Windows: `{FOLDERID_RoamingAppData}\report-agent\`
/// - Linux: `$XDG_DATA_HOME/report-agent/` (fallback `~/.local/share/...`)
///
/// Falls back to `~/.report-agent/` only if none of the above can be resolved.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("report-agent");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".report-agent")
}

/// Resolve the catalog cache database path.
///
/// An explicit path wins; otherwise the data directory is used (created if
/// needed).
pub fn resolve_cache_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let dir = data_dir();
    if !dir.exists() {
        let _ = std::fs::create_dir_all(&dir);
    }
    dir.join(CACHE_DB_FILE)
}

/// Initialize the tracing subscriber, writing structured logs to the data directory.
///
/// On each startup:
/// 1. Rotates existing logs (agent.log → agent.log.1 → .2 → .3, keeps last 3).
/// 2. Opens a fresh agent.log with a line-flushing writer.
///
/// Stdout stays reserved for request results. If the log file cannot be
/// opened, logs go to stderr instead.
pub fn init_tracing(filter_directive: Option<&str>) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = filter_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("report_agent=info,warn"));

    let log_dir = data_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join(LOG_FILE);

    rotate_log_file(&log_path, LOG_GENERATIONS);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            fmt::fmt()
                .with_env_filter(filter)
                .with_writer(FlushingWriter::new(file))
                .with_ansi(false)
                .with_target(true)
                .init();
        }
        Err(_) => {
            fmt::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "=== Report Agent starting ==="
    );
}

/// Shift the log chain by one generation: `agent.log` becomes `agent.log.1`,
/// `.1` becomes `.2`, and so on up to `.{keep}`, which is dropped.
///
/// Gaps in the chain are tolerated.
fn rotate_log_file(base_path: &Path, keep: u32) {
    if keep == 0 {
        let _ = std::fs::remove_file(base_path);
        return;
    }
    let _ = std::fs::remove_file(log_generation(base_path, keep));
    for generation in (1..keep).rev() {
        let _ = std::fs::rename(
            log_generation(base_path, generation),
            log_generation(base_path, generation + 1),
        );
    }
    let _ = std::fs::rename(base_path, log_generation(base_path, 1));
}

/// Path of rotated generation `n` of `base_path` (`agent.log.{n}`).
fn log_generation(base_path: &Path, n: u32) -> PathBuf {
    let mut name = base_path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// A writer that wraps `std::fs::File` and flushes after every write.
#[derive(Clone)]
struct FlushingWriter {
    file: std::sync::Arc<std::sync::Mutex<std::fs::File>>,
}

impl FlushingWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: std::sync::Arc::new(std::sync::Mutex::new(file)),
        }
    }
}

impl std::io::Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        let n = std::io::Write::write(&mut *f, buf)?;
        std::io::Write::flush(&mut *f)?;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        std::io::Write::flush(&mut *f)
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FlushingWriter {
    type Writer = FlushingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
