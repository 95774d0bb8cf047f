//! LLM-backed risk analysis of news headlines.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PredictError, RiskLevel};
use crate::llm::{LlmClient, PromptTemplate};

/// Analysis of a single headline. Lives only until aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItemAnalysis {
    /// Bullet lines extracted from the reply, dash marker included.
    pub detected_risks: Vec<String>,
    pub risk_level: RiskLevel,
    /// The full raw reply text.
    pub potential_impact: String,
}

/// Aggregated news risk signal for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRiskSignal {
    pub risk_level: RiskLevel,
    /// Union of detected risks across all headlines, deduplicated.
    pub detected_risks: Vec<String>,
    /// Raw per-headline replies, in input order.
    pub insights: Vec<String>,
}

/// Analyzes each headline independently and aggregates the results.
#[derive(Debug, Clone)]
pub struct NewsAnalyzer {
    prompts: PromptTemplate,
    concurrency: usize,
}

impl NewsAnalyzer {
    pub fn new() -> Self {
        Self {
            prompts: PromptTemplate::default(),
            concurrency: 1,
        }
    }

    /// Set a custom prompt template.
    pub fn with_prompts(mut self, prompts: PromptTemplate) -> Self {
        self.prompts = prompts;
        self
    }

    /// Allow up to `concurrency` headline requests in flight at once.
    ///
    /// Results are collected in input order regardless of the window width,
    /// and the union/average aggregation is order-insensitive anyway, so this
    /// only changes latency, never the signal.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Analyze a non-empty set of headlines into one aggregate signal.
    ///
    /// Issues one LLM request per headline.
    pub async fn analyze(
        &self,
        client: &LlmClient,
        headlines: &[String],
    ) -> Result<NewsRiskSignal, PredictError> {
        if headlines.is_empty() {
            return Err(PredictError::NoNewsItems);
        }

        debug!("Analyzing {} news headlines", headlines.len());

        let analyses: Vec<NewsItemAnalysis> = stream::iter(headlines)
            .map(|headline| self.analyze_headline(client, headline))
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(aggregate(analyses))
    }

    async fn analyze_headline(&self, client: &LlmClient, headline: &str) -> NewsItemAnalysis {
        let messages = self.prompts.news_analysis(headline);
        let reply = client.complete(messages).await;
        parse_news_reply(reply)
    }
}

impl Default for NewsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a per-headline analysis from the raw reply text.
///
/// Every trimmed line starting with a dash bullet is a detected risk. The
/// severity is always Medium: the reply's own wording is deliberately not
/// mined for a level, and the aggregation math below depends on this default.
pub(crate) fn parse_news_reply(reply: String) -> NewsItemAnalysis {
    let detected_risks = reply
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(str::to_string)
        .collect();

    NewsItemAnalysis {
        detected_risks,
        risk_level: RiskLevel::Medium,
        potential_impact: reply,
    }
}

/// Merge per-headline analyses into one signal.
///
/// The overall level is the average of the per-item weights mapped back onto
/// the scale; detected risks are a deduplicated union; insights keep the raw
/// replies in input order.
fn aggregate(analyses: Vec<NewsItemAnalysis>) -> NewsRiskSignal {
    let avg = analyses.iter().map(|a| a.risk_level.weight()).sum::<f64>() / analyses.len() as f64;
    let risk_level = RiskLevel::from_average(avg);

    let mut seen = std::collections::HashSet::new();
    let mut detected_risks = Vec::new();
    for analysis in &analyses {
        for risk in &analysis.detected_risks {
            if seen.insert(risk.clone()) {
                detected_risks.push(risk.clone());
            }
        }
    }

    let insights = analyses.into_iter().map(|a| a.potential_impact).collect();

    NewsRiskSignal {
        risk_level,
        detected_risks,
        insights,
    }
}
