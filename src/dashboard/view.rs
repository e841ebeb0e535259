//! Terminal rendering of the compliance tab.

use crate::data::ComplianceRecord;
use crate::dashboard::LoadState;
use crate::logging::log_render;
use crate::metrics::{grid_columns_for, ChartDatum, ComplianceSummary, GridColumns};
use crate::risk::risk_level;

pub const LOADING_TEXT: &str = "Loading compliance data...";
pub const ERROR_TITLE: &str = "Error loading compliance data";
pub const RETRY_HINT: &str = "[r] Retry";
pub const EMPTY_TEXT: &str = "No compliance data available";
pub const CHART_HEADING: &str = "Compliance-wise Distribution of risk score";

const CELL_WIDTH: usize = 24;
const BAR_CELLS: usize = 10;

/// Short name of the view a state maps to.
pub fn view_kind(state: &LoadState) -> &'static str {
    match state {
        LoadState::Loading => "loading",
        LoadState::Failed(_) => "error",
        LoadState::Ready(snap) if snap.is_empty() => "empty",
        LoadState::Ready(_) => "populated",
    }
}

pub fn render(state: &LoadState) -> String {
    let rows = state.snapshot().map(|s| s.len()).unwrap_or(0);
    log_render(view_kind(state), rows);
    match state {
        LoadState::Loading => format!("{}\n", LOADING_TEXT),
        LoadState::Failed(err) => format!("{}\n{}\n\n{}\n", ERROR_TITLE, err, RETRY_HINT),
        LoadState::Ready(snap) if snap.is_empty() => format!("{}\n", EMPTY_TEXT),
        LoadState::Ready(snap) => {
            let summary = ComplianceSummary::from_records(snap.records());
            render_populated(&summary, snap.records())
        }
    }
}

pub fn render_json(summary: &ComplianceSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

pub fn render_populated(summary: &ComplianceSummary, records: &[ComplianceRecord]) -> String {
    let mut out = String::new();
    render_stat_cards(&mut out, summary);
    out.push('\n');
    render_charts(&mut out, summary);
    out.push('\n');
    render_table(&mut out, records);
    out
}

fn render_stat_cards(out: &mut String, summary: &ComplianceSummary) {
    let cards = [
        ("Overall Risk Score", summary.overall_score as usize),
        ("High", summary.high),
        ("Medium", summary.medium),
        ("Low", summary.low),
    ];
    let rule = format!("+{}+\n", vec!["-".repeat(CELL_WIDTH); cards.len()].join("+"));
    out.push_str(&rule);
    let labels: Vec<String> = cards.iter().map(|(l, _)| pad(l, CELL_WIDTH)).collect();
    let values: Vec<String> = cards.iter().map(|(_, v)| pad(&v.to_string(), CELL_WIDTH)).collect();
    out.push_str(&format!("|{}|\n", labels.join("|")));
    out.push_str(&format!("|{}|\n", values.join("|")));
    out.push_str(&rule);
}

fn render_charts(out: &mut String, summary: &ComplianceSummary) {
    out.push_str(&format!("{}    [#] High  [+] Medium  [.] Low\n", CHART_HEADING));
    let columns: GridColumns = grid_columns_for(summary.category_count as i64);
    for row in summary.charts.chunks(columns.count()) {
        let cells: Vec<[String; 3]> = row.iter().map(|c| donut_cell(&c.category, &c.datum)).collect();
        for line in 0..3 {
            let joined: Vec<&str> = cells.iter().map(|c| c[line].as_str()).collect();
            out.push_str(joined.join("  ").trim_end());
            out.push('\n');
        }
        out.push('\n');
    }
    if summary.category_count > GridColumns::MAX as usize {
        out.push_str(&format!(
            "Showing {} compliance categories in a responsive grid layout\n",
            summary.charts.len()
        ));
    }
}

/// Three text lines standing in for one donut: ring, centre value, label.
pub fn donut_cell(label: &str, datum: &ChartDatum) -> [String; 3] {
    let filled = ((datum.filled_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled));
    [
        pad(&bar, CELL_WIDTH),
        pad(&format!("{} ({:.1}%)", datum.value, datum.filled_percent), CELL_WIDTH),
        pad(label, CELL_WIDTH),
    ]
}

fn render_table(out: &mut String, records: &[ComplianceRecord]) {
    out.push_str(&format!(
        "{} {} {} {} {}\n",
        pad("ID", 6),
        pad("TYPE", 14),
        pad("COMPLIANCE ITEM", 30),
        pad("SEVERITY", 24),
        "ANALYSIS"
    ));
    for (index, record) in records.iter().enumerate() {
        let severity = record.severity.as_deref().unwrap_or("");
        let level = risk_level(record.severity.as_deref());
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            pad(&record.row_key(index), 6),
            pad(record.category.as_deref().unwrap_or(""), 14),
            pad(record.checklist_item.as_deref().unwrap_or(""), 30),
            pad(&format!("{} [{}]", severity, level), 24),
            record.analysis_or_placeholder()
        ));
    }
}

/// Left-align `s` in exactly `width` chars, truncating with `~`.
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{}{}", s, " ".repeat(width - len))
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}
