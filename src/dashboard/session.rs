//! The interactive load loop behind the binary.

use anyhow::{bail, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::dashboard::{view, Dashboard, LoadState};
use crate::feed::RecordSource;
use crate::logging::{log, obj, v_num, Domain, Level};
use crate::metrics::ComplianceSummary;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Print the summary as JSON; implies no prompt.
    pub json: bool,
    pub no_retry: bool,
}

/// Load until the dashboard is ready or the user declines a retry.
///
/// Each pass renders the current state before the fetch resolves, so a retry
/// shows the loading view again instead of the previous error.
pub async fn run<R, W>(
    dashboard: &mut Dashboard,
    source: &dyn RecordSource,
    opts: SessionOptions,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut ticket = dashboard.begin_load();

    loop {
        if !opts.json {
            write!(out, "{}", view::render(dashboard.state()))?;
            out.flush()?;
        }
        dashboard.load_with(ticket, source).await;

        let err = match dashboard.state() {
            LoadState::Ready(snap) => {
                if opts.json {
                    let summary = ComplianceSummary::from_records(snap.records());
                    writeln!(out, "{}", view::render_json(&summary)?)?;
                } else {
                    write!(out, "{}", view::render(dashboard.state()))?;
                }
                return Ok(());
            }
            LoadState::Failed(err) => err.clone(),
            LoadState::Loading => bail!("load finished without a result"),
        };

        if opts.json || opts.no_retry {
            return Err(err.into());
        }
        write!(out, "{}> ", view::render(dashboard.state()))?;
        out.flush()?;
        match lines.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("r") => {
                ticket = dashboard.retry();
                log(
                    Level::Info,
                    Domain::System,
                    "retry_requested",
                    obj(&[("seq", v_num(ticket.seq() as f64))]),
                );
            }
            _ => return Err(err.into()),
        }
    }
}
