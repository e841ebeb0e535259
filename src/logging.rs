//! Structured logging for the compliance dashboard.
//!
//! Every record is one JSON line: `ts, run_id, seq, lvl, component, event, msg, data`.
//! Lines go to stderr so stdout stays free for the rendered view; when
//! `LOG_DIR` is set they are also appended to `<LOG_DIR>/<run_id>/events.jsonl`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_LEVEL").as_deref().unwrap_or("info"))
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fetch,     // HTTP requests against the compliance endpoint
    Aggregate, // Derived statistics
    Render,    // View output
    System,    // Startup, config, shutdown
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Fetch => "fetch",
            Domain::Aggregate => "aggregate",
            Domain::Render => "render",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let events = std::env::var("LOG_DIR")
            .ok()
            .and_then(|base| open_events_file(PathBuf::from(base), &run_id))
            .map(|f| Mutex::new(BufWriter::new(f)));
        RunContext { run_id, events }
    })
}

fn open_events_file(mut run_dir: PathBuf, run_id: &str) -> Option<File> {
    run_dir.push(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    let _ = std::fs::write(
        run_dir.join("manifest.json"),
        json!({
            "run_id": run_id,
            "ts": ts_now(),
            "pid": process::id(),
            "log_dir": run_dir.to_string_lossy(),
        })
        .to_string(),
    );
    match File::create(run_dir.join("events.jsonl")) {
        Ok(f) => Some(f),
        Err(err) => {
            eprintln!("[log] failed to create events log: {}", err);
            None
        }
    }
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    let min_level = Level::from_env();
    if level < min_level || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

/// Build the JSON line for a record without writing it.
pub fn format_record(
    run_id: &str,
    seq: u64,
    level: Level,
    component: &str,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    if let Some(endpoint) = fields.remove("endpoint") {
        entry.insert("endpoint".to_string(), endpoint);
    }
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = format_record(&ctx.run_id, next_seq(), level, component, event, fields);
    if let Some(events) = &ctx.events {
        write_line(events, &line);
    }
    eprintln!("{}", line);
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_fetch_start(endpoint: &str, request_seq: u64) {
    log(
        Level::Info,
        Domain::Fetch,
        "fetch_start",
        obj(&[("endpoint", v_str(endpoint)), ("request_seq", json!(request_seq))]),
    );
}

pub fn fetch_ok_fields(
    endpoint: &str,
    records: usize,
    fingerprint: &str,
    fetched_at: &str,
    elapsed_ms: f64,
) -> Map<String, Value> {
    obj(&[
        ("endpoint", v_str(endpoint)),
        ("records", json!(records)),
        ("fingerprint", v_str(fingerprint)),
        ("fetched_at", v_str(fetched_at)),
        ("elapsed_ms", v_num(elapsed_ms)),
    ])
}

pub fn log_fetch_ok(endpoint: &str, records: usize, fingerprint: &str, fetched_at: &str, elapsed_ms: f64) {
    log(
        Level::Info,
        Domain::Fetch,
        "fetch_ok",
        fetch_ok_fields(endpoint, records, fingerprint, fetched_at, elapsed_ms),
    );
}

pub fn log_fetch_failed(endpoint: &str, kind: &str, detail: &str) {
    log(
        Level::Error,
        Domain::Fetch,
        "fetch_failed",
        obj(&[
            ("endpoint", v_str(endpoint)),
            ("kind", v_str(kind)),
            ("msg", v_str(detail)),
        ]),
    );
}

pub fn log_degraded_records(degraded: usize, total: usize) {
    log(
        Level::Warn,
        Domain::Fetch,
        "degraded_records",
        obj(&[("degraded", json!(degraded)), ("total", json!(total))]),
    );
}

pub fn log_stale_response(ticket_seq: u64, current_seq: u64) {
    log(
        Level::Warn,
        Domain::Fetch,
        "stale_response_discarded",
        obj(&[("ticket_seq", json!(ticket_seq)), ("current_seq", json!(current_seq))]),
    );
}

pub fn log_render(view: &str, rows: usize) {
    log(
        Level::Debug,
        Domain::Render,
        "render",
        obj(&[("view", v_str(view)), ("rows", json!(rows))]),
    );
}

pub fn log_summary(overall_score: u32, high: usize, medium: usize, low: usize, categories: usize) {
    log(
        Level::Info,
        Domain::Aggregate,
        "summary",
        obj(&[
            ("overall_score", json!(overall_score)),
            ("high", json!(high)),
            ("medium", json!(medium)),
            ("low", json!(low)),
            ("categories", json!(categories)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Tests
// =============================================================================
