use anyhow::{bail, Result};
use tokio::io::BufReader;

use legaldesk::dashboard::session::{self, SessionOptions};
use legaldesk::dashboard::Dashboard;
use legaldesk::feed::ComplianceFeed;
use legaldesk::logging::{log, obj, v_num, v_str, Domain, Level};
use legaldesk::state::{now_ts, Config};

const USAGE: &str = "usage: legaldesk [--json] [--no-retry]

Fetches the compliance checklist and prints the Legal Desk compliance view.

  --json       print the aggregate summary as JSON instead of the text view
  --no-retry   exit on a failed load instead of offering a retry

Environment: COMPLIANCE_ENDPOINT, COMPLIANCE_FIELD, REQUEST_TIMEOUT_SECS,
LOG_LEVEL, LOG_DOMAINS, LOG_DIR, RUN_ID";

#[derive(Debug, Default)]
struct Args {
    json: bool,
    no_retry: bool,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            "--no-retry" => args.no_retry = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument: {}\n\n{}", other, USAGE),
        }
    }
    Ok(Some(args))
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        println!("{}", USAGE);
        return Ok(());
    };
    let cfg = Config::from_env();
    cfg.validate()?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("endpoint", v_str(&cfg.endpoint)),
            ("collection_field", v_str(&cfg.collection_field)),
            ("timeout_secs", v_num(cfg.request_timeout_secs as f64)),
            ("started_at", v_num(now_ts() as f64)),
        ]),
    );

    let feed = ComplianceFeed::new(&cfg)?;
    let mut dashboard = Dashboard::new();
    let opts = SessionOptions {
        json: args.json,
        no_retry: args.no_retry,
    };
    let stdin = BufReader::new(tokio::io::stdin());
    session::run(&mut dashboard, &feed, opts, stdin, &mut std::io::stdout()).await
}
