//! Chat-completion client used by the risk pipeline.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::utils::{ConfigError, LlmSettings};

/// Message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// OpenAI-compatible request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI-compatible response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// The client is stateless beyond its credentials and request defaults, so a
/// single instance can serve any number of concurrent calls.
pub struct LlmClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
}

impl LlmClient {
    /// Build a client from settings.
    ///
    /// Fails fast when no API key is configured; every other failure mode is
    /// handled per request.
    pub fn new(settings: &LlmSettings) -> Result<Self, ConfigError> {
        let api_key = settings
            .get_api_key()
            .ok_or_else(|| ConfigError::MissingApiKey(settings.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.resolve_base_url(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_retries: settings.max_retries,
        })
    }

    /// Get the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Send a completion request and return the reply text.
    ///
    /// Any transport, authentication, or API failure is logged and reported
    /// as an empty string so that one failed call cannot abort a multi-request
    /// pipeline run. Downstream parsers treat the empty reply as "no usable
    /// content".
    pub async fn complete(&self, messages: Vec<Message>) -> String {
        match self.try_complete(&messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!("LLM request failed, continuing with empty reply: {e:#}");
                String::new()
            }
        }
    }

    async fn try_complete(&self, messages: &[Message]) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!("Retrying LLM request ({}/{})", attempt, self.max_retries);
            }
            match self.send_once(messages).await {
                Ok(text) => return Ok(text),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("LLM request was never attempted")))
    }

    async fn send_once(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending chat completion request to {}", url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat completion API error {}: {}", status, error_text);
        }

        let data: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        if let Some(usage) = &data.usage {
            info!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        data.choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("Chat completion returned no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> LlmSettings {
        LlmSettings {
            api_key: Some("test-key".to_string()),
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_message_creation() {
        let system = Message::system("You are a risk analyst.");
        assert_eq!(system.role, "system");

        let user = Message::user("Analyze this.");
        assert_eq!(user.role, "user");

        let assistant = Message::assistant("Done.");
        assert_eq!(assistant.role, "assistant");
    }

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new(&test_settings()).unwrap();
        assert_eq!(client.model_name(), crate::utils::DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let settings = LlmSettings {
            api_key: None,
            api_key_env: "UNSET_TEST_KEY_VAR_55191".to_string(),
            ..Default::default()
        };

        let err = LlmClient::new(&settings).err().expect("construction should fail");
        match err {
            ConfigError::MissingApiKey(var) => assert_eq!(var, "UNSET_TEST_KEY_VAR_55191"),
            other => panic!("expected MissingApiKey, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_empty_reply() {
        let settings = LlmSettings {
            timeout_ms: 500,
            max_retries: 0,
            ..test_settings()
        };
        let client = LlmClient::new(&settings).unwrap();

        let reply = client.complete(vec![Message::user("hello")]).await;
        assert_eq!(reply, "");
    }
}
