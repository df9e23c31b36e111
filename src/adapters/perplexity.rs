//! Perplexity chat-completions client.
//!
//! Endpoint: POST /chat/completions
//! Auth: Bearer token

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdapterError, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3-sonar-large-32k";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Connection and sampling settings
#[derive(Debug, Clone, PartialEq)]
pub struct PerplexitySettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for PerplexitySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

/// Request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Response body (only the parts we read)
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice
    pub fn into_content(self) -> Result<String, AdapterError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            AdapterError::MalformedResponse("response has no choices".to_string())
        })?;

        let content = choice.message.and_then(|m| m.content).ok_or_else(|| {
            AdapterError::MalformedResponse("choice has no message content".to_string())
        })?;

        if content.trim().is_empty() {
            return Err(AdapterError::EmptyContent);
        }

        Ok(content)
    }
}

/// Perplexity API client
pub struct PerplexityClient {
    api_key: String,
    settings: PerplexitySettings,
    client: reqwest::Client,
}

impl PerplexityClient {
    /// Create a client; fails without an API key
    pub fn new(settings: PerplexitySettings) -> Result<Self, AdapterError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdapterError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            api_key,
            settings,
            client,
        })
    }

    /// Build the JSON request body
    pub fn build_request<'a>(&'a self, prompt: &'a str, system_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl TextGenerator for PerplexityClient {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn ask(&self, prompt: &str, system_prompt: &str) -> Result<String, AdapterError> {
        let body = self.build_request(prompt, system_prompt);

        let response = self
            .client
            .post(&self.settings.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), "Received chat completion");

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AdapterError::MalformedResponse(e.to_string()))?;
        parsed.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key() -> PerplexitySettings {
        PerplexitySettings {
            api_key: Some("pplx-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = PerplexityClient::new(PerplexitySettings::default());
        assert!(matches!(result, Err(AdapterError::MissingApiKey)));

        let blank = PerplexitySettings {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            PerplexityClient::new(blank),
            Err(AdapterError::MissingApiKey)
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let client = PerplexityClient::new(settings_with_key()).unwrap();
        assert_eq!(client.name(), "perplexity");

        let request = client.build_request("find startups", "be brief");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "find startups");
    }

    #[test]
    fn test_response_content_extraction() {
        let ok: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"[]"}}]}"#).unwrap();
        assert_eq!(ok.into_content().unwrap(), "[]");

        let no_choices: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(matches!(
            no_choices.into_content(),
            Err(AdapterError::MalformedResponse(_))
        ));

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(blank.into_content(), Err(AdapterError::EmptyContent)));
    }
}
