//! Prompt templates for news analysis and risk synthesis.

use super::Message;
use crate::risk::RiskLevel;

/// System persona for per-headline news analysis.
const NEWS_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in analyzing news for supply chain risks. Provide a concise analysis focusing on potential risks, their severity, and possible impacts on supply chains.";

const NEWS_USER_PROMPT: &str = "Analyze this news article for supply chain risks: {news}";

/// System persona for the final synthesis request.
const SYNTHESIS_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in supply chain risk assessment and mitigation strategies.";

/// Template for the combined assessment request. The section layout here is
/// what the response parser expects to find in the reply.
const SYNTHESIS_PROMPT: &str = r#"Based on the following information, provide a comprehensive supply chain risk assessment:

Historical Risk Level: {historical_risk}
News-based Risk Level: {news_risk}
Detected Risks: {detected_risks}

Include in your assessment:
1. An overall risk level (Low, Medium, or High)
2. A brief explanation of the risk assessment
3. Key risk factors
4. 3-5 actionable recommendations for risk mitigation

Format your response with clear headers for each section."#;

/// Builds the message sequences sent to the LLM.
///
/// Both system personas can be swapped out, which keeps prompt wording a
/// configuration concern rather than something baked into the analyzers.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    news_system: String,
    synthesis_system: String,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self {
            news_system: NEWS_SYSTEM_PROMPT.to_string(),
            synthesis_system: SYNTHESIS_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the news-analysis system persona.
    pub fn with_news_system(mut self, prompt: &str) -> Self {
        self.news_system = prompt.to_string();
        self
    }

    /// Replace the synthesis system persona.
    pub fn with_synthesis_system(mut self, prompt: &str) -> Self {
        self.synthesis_system = prompt.to_string();
        self
    }

    /// Two-message prompt asking for a risk analysis of one headline.
    pub fn news_analysis(&self, headline: &str) -> Vec<Message> {
        vec![
            Message::system(&self.news_system),
            Message::user(&NEWS_USER_PROMPT.replace("{news}", headline)),
        ]
    }

    /// Combined prompt asking the LLM to merge both signal sources into one
    /// structured assessment.
    pub fn risk_synthesis(
        &self,
        historical_risk: RiskLevel,
        news_risk: RiskLevel,
        detected_risks: &[String],
    ) -> Vec<Message> {
        let prompt = SYNTHESIS_PROMPT
            .replace("{historical_risk}", &historical_risk.to_string())
            .replace("{news_risk}", &news_risk.to_string())
            .replace("{detected_risks}", &detected_risks.join(", "));

        vec![
            Message::system(&self.synthesis_system),
            Message::user(&prompt),
        ]
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}
