//! Shipment record types and raw-data preparation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of historical shipment data as it appears in the source CSV.
///
/// Quantity received and days delayed may be blank in the source data and are
/// filled in during processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawShipmentRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Product_ID")]
    pub product_id: String,
    #[serde(rename = "Supplier_ID")]
    pub supplier_id: String,
    #[serde(rename = "Quantity_Ordered")]
    pub quantity_ordered: f64,
    #[serde(rename = "Quantity_Received")]
    pub quantity_received: Option<f64>,
    #[serde(rename = "Days_Delayed")]
    pub days_delayed: Option<f64>,
    #[serde(rename = "Transportation_Mode")]
    pub transportation_mode: String,
    #[serde(rename = "Weather_Condition")]
    pub weather_condition: String,
    #[serde(rename = "Political_Stability_Index")]
    pub political_stability_index: f64,
    #[serde(rename = "Port_Congestion_Level")]
    pub port_congestion_level: String,
}

/// A processed shipment record, ready for risk analysis.
///
/// The delay flag and quantity difference are derived here, before the record
/// reaches any analyzer. Categorical columns are encoded as integer codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub date: NaiveDate,
    pub product_id: String,
    pub supplier_id: String,
    pub quantity_ordered: f64,
    pub quantity_received: f64,
    pub days_delayed: f64,
    /// True when the shipment reported a positive delay.
    pub is_delayed: bool,
    /// Ordered minus received quantity.
    pub quantity_difference: f64,
    /// Categorical code for the transportation mode.
    pub transportation_mode: i16,
    /// Categorical code for the weather condition.
    pub weather_condition: i16,
    pub political_stability_index: f64,
    /// Categorical code (Low=0, Medium=1, High=2); `None` when unreported.
    pub port_congestion_level: Option<i16>,
}

/// Cleans raw shipment rows and derives the analysis columns.
#[derive(Debug, Clone, Default)]
pub struct RecordProcessor;

impl RecordProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Process raw records into analysis-ready shipment records.
    ///
    /// Missing received quantities fall back to the ordered quantity and
    /// missing delay counts to zero. Transportation and weather codes follow
    /// the sorted order of the distinct values in the dataset.
    pub fn process(&self, raw: &[RawShipmentRecord]) -> Result<Vec<ShipmentRecord>> {
        let transport_codes = categorical_codes(raw.iter().map(|r| r.transportation_mode.as_str()));
        let weather_codes = categorical_codes(raw.iter().map(|r| r.weather_condition.as_str()));

        raw.iter()
            .map(|r| {
                let date = parse_date(&r.date)
                    .with_context(|| format!("Invalid date {:?} in shipment record", r.date))?;

                let quantity_received = r.quantity_received.unwrap_or(r.quantity_ordered);
                let days_delayed = r.days_delayed.unwrap_or(0.0);

                Ok(ShipmentRecord {
                    date,
                    product_id: r.product_id.clone(),
                    supplier_id: r.supplier_id.clone(),
                    quantity_ordered: r.quantity_ordered,
                    quantity_received,
                    days_delayed,
                    is_delayed: days_delayed > 0.0,
                    quantity_difference: r.quantity_ordered - quantity_received,
                    transportation_mode: code_for(&transport_codes, &r.transportation_mode),
                    weather_condition: code_for(&weather_codes, &r.weather_condition),
                    political_stability_index: r.political_stability_index,
                    port_congestion_level: congestion_code(&r.port_congestion_level),
                })
            })
            .collect()
    }
}

/// Assign integer codes to the sorted distinct values of a categorical column.
fn categorical_codes<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(|v| v.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn code_for(categories: &[String], value: &str) -> i16 {
    categories
        .iter()
        .position(|c| c == value)
        .map(|i| i as i16)
        .unwrap_or(-1)
}

fn congestion_code(value: &str) -> Option<i16> {
    match value {
        "Low" => Some(0),
        "Medium" => Some(1),
        "High" => Some(2),
        _ => None,
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(date);
        }
    }
    anyhow::bail!("Unrecognized date format: {text:?}")
}
