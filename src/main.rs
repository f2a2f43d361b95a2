//! Report Agent CLI.
//!
//! Authenticates against Cognos Analytics, refreshes the local catalog cache,
//! then serves either one request (`--request`) or a read loop
//! (`--interactive`, type `quit` to exit).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use report_agent::agent::{
    run_loop, serve_once, start_session, ReportAgent, DEFAULT_OUTPUT_FORMAT,
};
use report_agent::catalog::CatalogCache;
use report_agent::service::{ReportServiceClient, ServiceConfig, DEFAULT_BASE_URL};

/// Match free-text requests to Cognos reports and download the output.
#[derive(Parser, Debug)]
#[command(name = "report-agent", version, about, long_about = None)]
#[command(after_help = "Examples:
  report-agent --request \"daily sales for Q4\"
  report-agent --interactive
  report-agent --list --skip-refresh
")]
struct Cli {
    /// Report request (one-shot mode)
    #[arg(short, long)]
    request: Option<String>,

    /// Read requests from stdin until `quit` or end of input
    #[arg(short, long)]
    interactive: bool,

    /// Print the cached catalog and exit
    #[arg(long)]
    list: bool,

    /// Output format requested from the service (pdf, xlsx, csv, ...)
    #[arg(long, default_value = DEFAULT_OUTPUT_FORMAT)]
    format: String,

    /// Directory for downloaded reports (default: system temp dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Catalog cache database path
    #[arg(long, env = "REPORT_AGENT_CACHE_DB")]
    cache_db: Option<PathBuf>,

    /// Reuse the persisted catalog instead of re-fetching it
    #[arg(long)]
    skip_refresh: bool,

    /// Cognos Analytics base URL
    #[arg(long, env = "COGNOS_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Cognos user ID
    #[arg(long, env = "COGNOS_USER")]
    user: Option<String>,

    /// Cognos password
    #[arg(long, env = "COGNOS_PASS", hide_env_values = true)]
    password: Option<String>,

    /// Log filter directive (e.g. `report_agent=debug`)
    #[arg(long, env = "REPORT_AGENT_LOG")]
    log: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    report_agent::init_tracing(cli.log.as_deref());

    let config = ServiceConfig::new(&cli.url, cli.user.clone(), cli.password.clone())
        .context("invalid reporting service configuration")?;
    let client = ReportServiceClient::new(config)?;

    let cache_path = report_agent::resolve_cache_path(cli.cache_db.as_deref());
    let mut cache = CatalogCache::open(&cache_path.to_string_lossy())
        .with_context(|| format!("failed to open catalog cache {}", cache_path.display()))?;

    let cached = start_session(&client, &mut cache, !cli.skip_refresh).await?;
    eprintln!("Authenticated; {cached} reports cached");

    if cli.list {
        for report in cache.find("")? {
            println!("{}\t{}\t{}", report.id, report.name, report.path);
        }
        return Ok(());
    }

    let output_dir = cli.output_dir.clone().unwrap_or_else(std::env::temp_dir);
    let agent = ReportAgent::new(&client, &cache, output_dir, cli.format.as_str());

    let mut stdout = std::io::stdout();
    if cli.interactive {
        run_loop(&agent, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    } else {
        serve_once(&agent, cli.request.as_deref(), &mut stdout).await?;
    }
    Ok(())
}
