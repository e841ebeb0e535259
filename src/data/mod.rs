use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::logging::log_degraded_records;

pub const ANALYSIS_PLACEHOLDER: &str = "No analysis provided";

/// One checklist entry as served by the compliance endpoint.
///
/// The wire names (`type`, `Checklist Item`, `Severity of Risk`, `Analysis`, `id`)
/// only appear in the serde attributes below. Fields with an unusable JSON type
/// decode as absent instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    #[serde(rename = "type", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "Checklist Item", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub checklist_item: Option<String>,
    #[serde(rename = "Severity of Risk", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "Analysis", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

const TEXT_FIELDS: [&str; 4] = ["type", "Checklist Item", "Severity of Risk", "Analysis"];

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl ComplianceRecord {
    pub fn new(category: &str, checklist_item: &str, severity: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            checklist_item: Some(checklist_item.to_string()),
            severity: Some(severity.to_string()),
            analysis: None,
            id: None,
        }
    }

    pub fn with_analysis(mut self, analysis: &str) -> Self {
        self.analysis = Some(analysis.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Stable identity for list rendering: the `id` if present, otherwise the position.
    pub fn row_key(&self, index: usize) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => index.to_string(),
        }
    }

    pub fn analysis_or_placeholder(&self) -> &str {
        match self.analysis.as_deref() {
            Some(a) if !a.is_empty() => a,
            _ => ANALYSIS_PLACEHOLDER,
        }
    }
}

/// Decode a single element. The flag is true when anything had to be dropped.
pub fn decode_record(value: &Value) -> (ComplianceRecord, bool) {
    let Value::Object(fields) = value else {
        return (ComplianceRecord::default(), true);
    };
    let degraded = TEXT_FIELDS
        .iter()
        .any(|k| matches!(fields.get(*k), Some(v) if !v.is_string() && !v.is_null()))
        || matches!(fields.get("id"), Some(v) if !v.is_string() && !v.is_number() && !v.is_null());
    match serde_json::from_value::<ComplianceRecord>(value.clone()) {
        Ok(record) => (record, degraded),
        Err(_) => (ComplianceRecord::default(), true),
    }
}

/// Turn a response body into records.
///
/// A bare array is the collection; an object contributes the array under
/// `field`; any other shape yields an empty collection.
pub fn normalize_body(body: &Value, field: &str) -> Vec<ComplianceRecord> {
    let items: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get(field) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    let mut degraded = 0usize;
    let records: Vec<ComplianceRecord> = items
        .iter()
        .map(|item| {
            let (record, lossy) = decode_record(item);
            if lossy {
                degraded += 1;
            }
            record
        })
        .collect();
    if degraded > 0 {
        log_degraded_records(degraded, records.len());
    }
    records
}

/// Immutable view of one successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    records: Arc<[ComplianceRecord]>,
    fingerprint: String,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(records: Vec<ComplianceRecord>) -> Self {
        let fingerprint = records_sha256(&records);
        Self {
            records: records.into(),
            fingerprint,
            fetched_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[ComplianceRecord] {
        &self.records
    }

    /// Hex SHA-256 of the records' canonical JSON.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// `fetched_at` as RFC3339 with milliseconds, the format log lines use.
    pub fn fetched_at_rfc3339(&self) -> String {
        self.fetched_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn records_sha256(records: &[ComplianceRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(records).unwrap_or_default());
    hex::encode(hasher.finalize())
}
