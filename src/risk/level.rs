//! Risk level vocabulary shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-step risk severity scale.
///
/// The same scale is used both as a classification output and as an ordinal
/// input when averaging per-headline severities, so each level carries an
/// explicit numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Numeric weight used when averaging levels (Low=1, Medium=2, High=3).
    pub fn weight(&self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 2.0,
            RiskLevel::High => 3.0,
        }
    }

    /// Classify an average of weights back into a level.
    ///
    /// Thresholds are strict: an average of exactly 2.0 is Medium and an
    /// average of exactly 1.5 is Low.
    pub fn from_average(avg: f64) -> Self {
        if avg > 2.0 {
            RiskLevel::High
        } else if avg > 1.5 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Parse a level word from LLM output, case-insensitively.
    pub fn parse_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Medium
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}
