//! Final assessment synthesis and response parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::RiskLevel;
use crate::llm::{LlmClient, PromptTemplate};

/// Structured fields recovered from the synthesis reply.
///
/// Parsing is best-effort: every field has a defined default, so a reply in
/// any shape, including the empty string, produces a usable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAssessment {
    pub overall_risk_level: RiskLevel,
    /// Free-text explanation; empty when the reply has no explanation header.
    pub assessment: String,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Strategy for recovering structure from a synthesis reply.
///
/// Implementations must be total: they return defaults on a parse miss and
/// never fail on malformed input. Swapping the parser goes hand in hand with
/// swapping the prompt template it expects.
pub trait AssessmentParser: Send + Sync {
    fn parse(&self, reply: &str) -> FinalAssessment;
}

/// Default parser matching the section layout requested by the built-in
/// synthesis prompt.
///
/// The LLM is not guaranteed to follow the template, so extraction leans on
/// loose structural markers: a labeled level word, an explanation header,
/// numbered-list items, and lettered-list items. The lettered-item pattern
/// also matches incidental letter-parenthesis text inside prose; that
/// over-extraction is an accepted trait of the format.
pub struct RegexAssessmentParser {
    overall_level: Regex,
    explanation_header: Regex,
    numbered_marker: Regex,
    numbered_stop: Regex,
    lettered_marker: Regex,
    lettered_stop: Regex,
}

impl RegexAssessmentParser {
    pub fn new() -> Self {
        Self {
            overall_level: Regex::new(r"(?i)Overall Risk Level:?\s*(\w+)").unwrap(),
            explanation_header: Regex::new(r"(?i)Brief Explanation[:\n]+").unwrap(),
            numbered_marker: Regex::new(r"\d+\.\s*").unwrap(),
            numbered_stop: Regex::new(r"\n\d+\.").unwrap(),
            lettered_marker: Regex::new(r"[a-z]\)\s*").unwrap(),
            lettered_stop: Regex::new(r"\n[a-z]\)").unwrap(),
        }
    }

    fn extract_level(&self, reply: &str) -> RiskLevel {
        self.overall_level
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .and_then(|m| RiskLevel::parse_word(m.as_str()))
            .unwrap_or_default()
    }

    /// Text between the explanation header and the next numbered item, or the
    /// end of the reply.
    fn extract_explanation(&self, reply: &str) -> String {
        let Some(header) = self.explanation_header.find(reply) else {
            return String::new();
        };

        let rest = &reply[header.end()..];
        let end = self
            .numbered_stop
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());

        rest[..end].trim().to_string()
    }

    /// Every `marker` item in the reply, each captured until the next `stop`
    /// occurrence or the end of the text.
    fn extract_items(&self, reply: &str, marker: &Regex, stop: &Regex) -> Vec<String> {
        let mut items = Vec::new();
        let mut pos = 0;

        while pos < reply.len() {
            let Some(m) = marker.find_at(reply, pos) else {
                break;
            };

            let body_start = m.end();
            let rest = &reply[body_start..];
            match stop.find(rest) {
                Some(s) => {
                    items.push(rest[..s.start()].trim().to_string());
                    // Resume on the newline so the next marker is found.
                    pos = body_start + s.start() + 1;
                }
                None => {
                    items.push(rest.trim().to_string());
                    break;
                }
            }
        }

        items
    }
}

impl AssessmentParser for RegexAssessmentParser {
    fn parse(&self, reply: &str) -> FinalAssessment {
        FinalAssessment {
            overall_risk_level: self.extract_level(reply),
            assessment: self.extract_explanation(reply),
            risk_factors: self.extract_items(reply, &self.numbered_marker, &self.numbered_stop),
            recommendations: self.extract_items(reply, &self.lettered_marker, &self.lettered_stop),
        }
    }
}

impl Default for RegexAssessmentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the combined synthesis prompt, invokes the LLM, and parses the
/// reply into a [`FinalAssessment`].
pub struct Synthesizer {
    prompts: PromptTemplate,
    parser: Box<dyn AssessmentParser>,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self {
            prompts: PromptTemplate::default(),
            parser: Box::new(RegexAssessmentParser::new()),
        }
    }

    /// Set a custom prompt template.
    pub fn with_prompts(mut self, prompts: PromptTemplate) -> Self {
        self.prompts = prompts;
        self
    }

    /// Inject an alternate response parser.
    pub fn with_parser(mut self, parser: Box<dyn AssessmentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Merge both signal levels and the detected risks into one assessment.
    pub async fn synthesize(
        &self,
        client: &LlmClient,
        historical_risk: RiskLevel,
        news_risk: RiskLevel,
        detected_risks: &[String],
    ) -> FinalAssessment {
        let messages = self.prompts.risk_synthesis(historical_risk, news_risk, detected_risks);

        debug!(
            "Requesting final assessment (historical {}, news {}, {} detected risks)",
            historical_risk,
            news_risk,
            detected_risks.len()
        );

        let reply = client.complete(messages).await;
        let assessment = self.parser.parse(&reply);

        info!(
            "Final assessment: {} risk, {} factors, {} recommendations",
            assessment.overall_risk_level,
            assessment.risk_factors.len(),
            assessment.recommendations.len()
        );

        assessment
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}
