//! Severity classification.
//!
//! Severity arrives as free text. Classification is a case-insensitive
//! substring search in the fixed order `no risk`, `mild`, `severe`; the
//! first phrase found wins, so "no risk of severe harm" is `Low`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phrases tested in priority order.
const SEVERITY_PHRASES: [(&str, RiskLevel); 3] = [
    ("no risk", RiskLevel::Low),
    ("mild", RiskLevel::Medium),
    ("severe", RiskLevel::High),
];

/// Highest score a single record can carry.
pub const MAX_RISK_SCORE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [RiskLevel::Unknown, RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Weight used for aggregate scoring: unknown 0, low 1, medium 2, high 3.
    pub fn score(&self) -> u32 {
        match self {
            RiskLevel::Unknown => 0,
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify severity text. Missing or unrecognised text is `Unknown`.
pub fn risk_level(severity: Option<&str>) -> RiskLevel {
    let Some(text) = severity else {
        return RiskLevel::Unknown;
    };
    let lower = text.to_lowercase();
    SEVERITY_PHRASES
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Unknown)
}

pub fn risk_score(severity: Option<&str>) -> u32 {
    risk_level(severity).score()
}
