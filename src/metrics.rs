//! Aggregate statistics over a loaded record collection.
//!
//! All functions are pure and total: they read the slice they are given and
//! return fresh values. Category comparison is case-insensitive throughout.

use serde::Serialize;
use std::collections::HashSet;

use crate::data::ComplianceRecord;
use crate::logging::log_summary;
use crate::risk::{risk_level, risk_score, RiskLevel, MAX_RISK_SCORE};

/// Per-category donut data. `filled_percent + empty_percent == 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartDatum {
    /// Summed risk score of the category's records.
    pub value: u32,
    pub filled_percent: f64,
    pub empty_percent: f64,
}

impl ChartDatum {
    fn from_totals(total_score: u32, item_count: usize) -> Self {
        let max_possible = item_count as f64 * MAX_RISK_SCORE as f64;
        let filled_percent = if max_possible > 0.0 {
            total_score as f64 / max_possible * 100.0
        } else {
            0.0
        };
        Self {
            value: total_score,
            filled_percent,
            empty_percent: 100.0 - filled_percent,
        }
    }
}

/// Column layout hint for the chart grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridColumns(u8);

impl GridColumns {
    pub const MAX: u8 = 6;
    pub const DEFAULT: u8 = 4;

    pub fn count(&self) -> usize {
        self.0 as usize
    }

    pub fn css_class(&self) -> String {
        format!("md:grid-cols-{}", self.0)
    }
}

/// 1..=6 map to themselves, anything larger clamps to 6, zero or negative gets 4.
pub fn grid_columns_for(category_count: i64) -> GridColumns {
    match category_count {
        n if n > GridColumns::MAX as i64 => GridColumns(GridColumns::MAX),
        n if n >= 1 => GridColumns(n as u8),
        _ => GridColumns(GridColumns::DEFAULT),
    }
}

fn non_empty_category(record: &ComplianceRecord) -> Option<&str> {
    record.category.as_deref().filter(|c| !c.is_empty())
}

/// Distinct categories, case-folded for identity, first-seen casing kept.
pub fn categories(records: &[ComplianceRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(non_empty_category)
        .filter(|c| seen.insert(c.to_lowercase()))
        .map(str::to_string)
        .collect()
}

pub fn category_count(records: &[ComplianceRecord]) -> usize {
    records
        .iter()
        .filter_map(non_empty_category)
        .map(str::to_lowercase)
        .collect::<HashSet<_>>()
        .len()
}

/// Sum of per-record risk scores (not an average).
pub fn overall_score(records: &[ComplianceRecord]) -> u32 {
    records.iter().map(|r| risk_score(r.severity.as_deref())).sum()
}

pub fn count_by_level(records: &[ComplianceRecord], level: RiskLevel) -> usize {
    records
        .iter()
        .filter(|r| risk_level(r.severity.as_deref()) == level)
        .count()
}

pub fn chart_data_for_category(records: &[ComplianceRecord], category: &str) -> ChartDatum {
    let wanted = category.to_lowercase();
    let (total, count) = records
        .iter()
        .filter(|r| r.category.as_deref().map(str::to_lowercase).as_deref() == Some(wanted.as_str()))
        .fold((0u32, 0usize), |(total, count), r| {
            (total + risk_score(r.severity.as_deref()), count + 1)
        });
    ChartDatum::from_totals(total, count)
}

pub fn chart_data(records: &[ComplianceRecord]) -> Vec<(String, ChartDatum)> {
    categories(records)
        .into_iter()
        .map(|c| {
            let datum = chart_data_for_category(records, &c);
            (c, datum)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryChart {
    pub category: String,
    #[serde(flatten)]
    pub datum: ChartDatum,
}

/// Everything the populated view shows, computed in one pass over the snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSummary {
    pub records: usize,
    pub overall_score: u32,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    pub category_count: usize,
    pub grid_columns: usize,
    pub charts: Vec<CategoryChart>,
}

impl ComplianceSummary {
    pub fn from_records(records: &[ComplianceRecord]) -> Self {
        let category_count = category_count(records);
        let summary = Self {
            records: records.len(),
            overall_score: overall_score(records),
            high: count_by_level(records, RiskLevel::High),
            medium: count_by_level(records, RiskLevel::Medium),
            low: count_by_level(records, RiskLevel::Low),
            unknown: count_by_level(records, RiskLevel::Unknown),
            category_count,
            grid_columns: grid_columns_for(category_count as i64).count(),
            charts: chart_data(records)
                .into_iter()
                .map(|(category, datum)| CategoryChart { category, datum })
                .collect(),
        };
        log_summary(
            summary.overall_score,
            summary.high,
            summary.medium,
            summary.low,
            summary.category_count,
        );
        summary
    }
}
