//! Console front end: one-shot requests and the interactive read loop.
//!
//! Results go to `output` (stdout in the binary), failures worth a log line
//! go to `tracing`.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::errors::AgentError;
use super::ReportAgent;

/// Request served when the binary is started without one.
pub const DEFAULT_REQUEST: &str = "daily sales";

/// Line that ends the interactive loop (case-insensitive).
pub const QUIT_SENTINEL: &str = "quit";

/// Printed when a request matches nothing in the cache.
pub const NO_MATCH_MESSAGE: &str = "No reports found";

const PROMPT: &str = "\nAsk for report: ";

/// Serve a single request, falling back to [`DEFAULT_REQUEST`].
///
/// `NoMatchFound` is printed, not returned. Every other failure is returned.
pub async fn serve_once<W: Write>(
    agent: &ReportAgent<'_>,
    request: Option<&str>,
    output: &mut W,
) -> Result<(), AgentError> {
    let request = request.unwrap_or(DEFAULT_REQUEST);
    match agent.process_request(request).await {
        Ok(outcome) => writeln!(output, "{outcome}")?,
        Err(AgentError::NoMatchFound { .. }) => writeln!(output, "{NO_MATCH_MESSAGE}")?,
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Prompt for requests on `input` until [`QUIT_SENTINEL`] or end of input.
///
/// Blank lines are skipped. Recoverable failures are printed and the loop
/// goes on; anything else ends it with the error.
pub async fn run_loop<R, W>(
    agent: &ReportAgent<'_>,
    input: R,
    output: &mut W,
) -> Result<(), AgentError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut served = 0usize;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let request = line.trim();
        if request.eq_ignore_ascii_case(QUIT_SENTINEL) {
            break;
        }
        if request.is_empty() {
            continue;
        }

        served += 1;
        match agent.process_request(request).await {
            Ok(outcome) => writeln!(output, "{outcome}")?,
            Err(AgentError::NoMatchFound { .. }) => writeln!(output, "{NO_MATCH_MESSAGE}")?,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(error = %e, request, "request failed");
                writeln!(output, "Error: {e}")?;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(served, "interactive session ended");
    Ok(())
}
