//! Risk assessment pipeline: statistical analysis, news analysis, and
//! LLM-backed synthesis.

mod historical;
mod level;
mod news;
mod predictor;
mod synthesis;

pub use historical::{HistoricalAnalyzer, HistoricalRiskSignal};
pub use level::RiskLevel;
pub use news::{NewsAnalyzer, NewsItemAnalysis, NewsRiskSignal};
pub use predictor::{RiskPredictor, RiskReport};
pub use synthesis::{AssessmentParser, FinalAssessment, RegexAssessmentParser, Synthesizer};

/// Precondition failures that abort a prediction run.
///
/// These are the only pipeline-level errors: LLM and parsing failures degrade
/// the report instead of failing it.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The historical dataset was empty, so the rates are undefined.
    #[error("historical shipment data is empty")]
    EmptyHistoricalData,

    /// No headlines were supplied, so the severity average is undefined.
    #[error("no news headlines to analyze")]
    NoNewsItems,
}
