//! Supply Chain Risk Prediction
//!
//! This crate predicts supply chain risk by combining deterministic
//! statistics over historical shipment data with LLM analysis of news
//! headlines.
//!
//! # Features
//!
//! - Load and prepare historical shipment records from CSV
//! - Derive delay and quantity-discrepancy risk signals from history
//! - Analyze news headlines for supply chain risks via an LLM
//! - Synthesize both signal sources into a structured risk report

pub mod data;
pub mod llm;
pub mod risk;
pub mod utils;

pub use data::{DataLoader, DataSummary, RecordProcessor, ShipmentRecord};
pub use llm::{LlmClient, Message, PromptTemplate};
pub use risk::{PredictError, RiskLevel, RiskPredictor, RiskReport};
pub use utils::{Config, ConfigError};
