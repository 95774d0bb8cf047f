//! Statistical risk analysis of historical shipment data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::{PredictError, RiskLevel};
use crate::data::ShipmentRecord;

/// Deterministic risk signal derived from the shipment history.
///
/// Created once per pipeline run and not modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRiskSignal {
    pub risk_level: RiskLevel,
    /// Deduplicated factor names ("frequent delays", "quantity discrepancies").
    pub risk_factors: Vec<String>,
    /// Four formatted insight lines, in a fixed order.
    pub insights: Vec<String>,
}

/// Delay rate above which the history alone is considered high risk.
const HIGH_DELAY_RATE: f64 = 0.2;
/// Delay or discrepancy rate above which a factor is flagged.
const ELEVATED_RATE: f64 = 0.1;

/// Computes delay and discrepancy rates and classifies them.
#[derive(Debug, Clone, Default)]
pub struct HistoricalAnalyzer;

impl HistoricalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a non-empty shipment history.
    ///
    /// Thresholds are strict: a delay rate of exactly 0.10 is still Low and
    /// raises no factor.
    pub fn analyze(&self, records: &[ShipmentRecord]) -> Result<HistoricalRiskSignal, PredictError> {
        if records.is_empty() {
            return Err(PredictError::EmptyHistoricalData);
        }

        let n = records.len() as f64;
        let delay_rate = records.iter().filter(|r| r.is_delayed).count() as f64 / n;
        let discrepancy_rate =
            records.iter().filter(|r| r.quantity_difference != 0.0).count() as f64 / n;

        debug!(
            "Historical rates: delay {:.4}, discrepancy {:.4} over {} records",
            delay_rate,
            discrepancy_rate,
            records.len()
        );

        let risk_level = if delay_rate > HIGH_DELAY_RATE {
            RiskLevel::High
        } else if delay_rate > ELEVATED_RATE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let mut risk_factors = Vec::new();
        if delay_rate > ELEVATED_RATE {
            risk_factors.push("frequent delays".to_string());
        }
        if discrepancy_rate > ELEVATED_RATE {
            risk_factors.push("quantity discrepancies".to_string());
        }

        let mean_stability =
            records.iter().map(|r| r.political_stability_index).sum::<f64>() / n;

        let insights = vec![
            format!("Historical delay rate: {:.2}%", delay_rate * 100.0),
            format!("Quantity discrepancy rate: {:.2}%", discrepancy_rate * 100.0),
            format!(
                "Most common transportation mode: {}",
                modal_transport_code(records)
            ),
            format!("Average political stability index: {:.2}", mean_stability),
        ];

        Ok(HistoricalRiskSignal {
            risk_level,
            risk_factors,
            insights,
        })
    }
}

/// Most frequent transportation code; ties go to the code encountered first.
fn modal_transport_code(records: &[ShipmentRecord]) -> i16 {
    let mut counts: HashMap<i16, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.transportation_mode).or_insert(0) += 1;
    }

    let mut best_code = records[0].transportation_mode;
    let mut best_count = 0;
    for record in records {
        let count = counts[&record.transportation_mode];
        if count > best_count {
            best_count = count;
            best_code = record.transportation_mode;
        }
    }
    best_code
}
