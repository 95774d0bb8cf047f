//! Loading of historical shipment data and news headlines.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::record::{RawShipmentRecord, ShipmentRecord};

/// Built-in headlines used when no news feed is configured.
const MOCK_NEWS: [&str; 5] = [
    "Severe flooding in Taiwan disrupts semiconductor production",
    "Trade tensions escalate between China and the United States",
    "Major cyberattack targets global shipping companies",
    "Labor strikes at key European ports cause shipment delays",
    "Unexpected surge in oil prices impacts global transportation costs",
];

/// Loads shipment history from CSV and supplies news headlines.
#[derive(Debug, Clone)]
pub struct DataLoader {
    csv_path: PathBuf,
}

impl DataLoader {
    pub fn new<P: AsRef<Path>>(csv_path: P) -> Self {
        Self {
            csv_path: csv_path.as_ref().to_path_buf(),
        }
    }

    /// Load raw shipment records from the configured CSV file.
    pub fn load_historical(&self) -> Result<Vec<RawShipmentRecord>> {
        if !self.csv_path.exists() {
            anyhow::bail!("Data file not found: {}", self.csv_path.display());
        }

        let mut reader = csv::Reader::from_path(&self.csv_path)
            .with_context(|| format!("Failed to open {}", self.csv_path.display()))?;

        let mut records = Vec::new();
        for (i, result) in reader.deserialize().enumerate() {
            let record: RawShipmentRecord = result
                .with_context(|| format!("Failed to parse row {} of {}", i + 1, self.csv_path.display()))?;
            records.push(record);
        }

        if records.is_empty() {
            warn!("Data file {} contains no records", self.csv_path.display());
        } else {
            info!(
                "Loaded {} records from {}",
                records.len(),
                self.csv_path.display()
            );
        }

        Ok(records)
    }

    /// Pre-defined mock news headlines.
    pub fn mock_news(&self) -> Vec<String> {
        MOCK_NEWS.iter().map(|s| s.to_string()).collect()
    }

    /// Read news headlines from a text file, one per line. Blank lines are
    /// skipped.
    pub fn load_headlines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read headlines from {}", path.as_ref().display()))?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Summary statistics over the processed shipment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_records: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub unique_products: usize,
    pub unique_suppliers: usize,
    pub avg_delay_days: f64,
}

impl DataSummary {
    /// Summarize a non-empty set of processed records. Returns `None` for an
    /// empty dataset.
    pub fn from_records(records: &[ShipmentRecord]) -> Option<Self> {
        let first = records.iter().map(|r| r.date).min()?;
        let last = records.iter().map(|r| r.date).max()?;

        let products: HashSet<&str> = records.iter().map(|r| r.product_id.as_str()).collect();
        let suppliers: HashSet<&str> = records.iter().map(|r| r.supplier_id.as_str()).collect();
        let avg_delay_days =
            records.iter().map(|r| r.days_delayed).sum::<f64>() / records.len() as f64;

        Some(Self {
            total_records: records.len(),
            first_date: first,
            last_date: last,
            unique_products: products.len(),
            unique_suppliers: suppliers.len(),
            avg_delay_days,
        })
    }
}

impl fmt::Display for DataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records:          {}", self.total_records)?;
        writeln!(f, "Date range:       {} to {}", self.first_date, self.last_date)?;
        writeln!(f, "Unique products:  {}", self.unique_products)?;
        writeln!(f, "Unique suppliers: {}", self.unique_suppliers)?;
        write!(f, "Avg delay (days): {:.2}", self.avg_delay_days)
    }
}
