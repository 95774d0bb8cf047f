//! Risk pipeline orchestration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::info;

use super::historical::HistoricalAnalyzer;
use super::news::NewsAnalyzer;
use super::synthesis::Synthesizer;
use super::{PredictError, RiskLevel};
use crate::data::ShipmentRecord;
use crate::llm::LlmClient;
use crate::utils::{Config, ConfigError};

/// Final risk report handed to the caller.
///
/// Assembled once per prediction and not touched afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub overall_risk_level: RiskLevel,
    /// Free-text explanation from the synthesis step.
    pub assessment: String,
    /// Deduplicated risk factors from the synthesis step.
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub historical_insights: Vec<String>,
    pub news_insights: Vec<String>,
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Supply Chain Risk Report")?;
        writeln!(f, "========================")?;
        writeln!(f, "Overall Risk Level: {}", self.overall_risk_level)?;

        if !self.assessment.is_empty() {
            writeln!(f)?;
            writeln!(f, "Assessment:")?;
            writeln!(f, "{}", self.assessment)?;
        }

        if !self.risk_factors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Risk Factors:")?;
            for factor in &self.risk_factors {
                writeln!(f, "  - {}", factor)?;
            }
        }

        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for (i, rec) in self.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, rec)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Historical Insights:")?;
        for insight in &self.historical_insights {
            writeln!(f, "  - {}", insight)?;
        }

        writeln!(f)?;
        writeln!(f, "News Insights:")?;
        for insight in &self.news_insights {
            writeln!(f, "  - {}", insight)?;
        }

        Ok(())
    }
}

/// Sequences the analyzers and the synthesizer into one prediction call.
pub struct RiskPredictor {
    client: LlmClient,
    historical: HistoricalAnalyzer,
    news: NewsAnalyzer,
    synthesizer: Synthesizer,
}

impl RiskPredictor {
    /// Build a predictor around an already-configured client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            historical: HistoricalAnalyzer::new(),
            news: NewsAnalyzer::new(),
            synthesizer: Synthesizer::new(),
        }
    }

    /// Build a predictor, client included, from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = LlmClient::new(&config.llm)?;
        Ok(Self::new(client).with_news_concurrency(config.llm.news_concurrency))
    }

    /// Replace the news analyzer.
    pub fn with_news_analyzer(mut self, news: NewsAnalyzer) -> Self {
        self.news = news;
        self
    }

    /// Replace the synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Set the news-analysis concurrency window.
    pub fn with_news_concurrency(mut self, concurrency: usize) -> Self {
        self.news = self.news.with_concurrency(concurrency);
        self
    }

    /// Predict supply chain risk from shipment history and news headlines.
    ///
    /// Both inputs must be non-empty; this is checked up front so neither
    /// analyzer starts work the other would invalidate. LLM failures inside
    /// the run degrade the report instead of failing it.
    pub async fn predict(
        &self,
        history: &[ShipmentRecord],
        headlines: &[String],
    ) -> Result<RiskReport, PredictError> {
        if history.is_empty() {
            return Err(PredictError::EmptyHistoricalData);
        }
        if headlines.is_empty() {
            return Err(PredictError::NoNewsItems);
        }

        info!(
            "Predicting risk from {} shipment records and {} headlines",
            history.len(),
            headlines.len()
        );

        let historical = self.historical.analyze(history)?;
        let news = self.news.analyze(&self.client, headlines).await?;

        let mut detected_risks = news.detected_risks.clone();
        detected_risks.extend(historical.risk_factors.iter().cloned());

        let assessment = self
            .synthesizer
            .synthesize(&self.client, historical.risk_level, news.risk_level, &detected_risks)
            .await;

        Ok(RiskReport {
            overall_risk_level: assessment.overall_risk_level,
            assessment: assessment.assessment,
            risk_factors: dedup(assessment.risk_factors),
            recommendations: assessment.recommendations,
            historical_insights: historical.insights,
            news_insights: news.insights,
        })
    }
}

/// Remove duplicate entries, keeping the first occurrence of each.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
