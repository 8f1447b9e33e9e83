//! OpenAI-compatible chat-completions backend.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::{VisionBackend, VisionFields};
use crate::error::VisionError;
use crate::parse::parse_reply;
use crate::Result;

/// Environment variable consulted first for the API key.
pub const API_KEY_ENV: &str = "PADEX_VISION_API_KEY";

/// Fallback environment variable for OpenAI-compatible deployments.
pub const API_KEY_ENV_FALLBACK: &str = "OPENAI_API_KEY";

const EXTRACTION_PROMPT: &str = "You are reading the data page of a passport. \
Return ONLY a JSON object with these keys: surname, given_names, \
passport_number, nationality, date_of_birth, date_of_issue, date_of_expiry. \
Dates must be formatted YYYY-MM-DD. Use an empty string for anything you \
cannot read. Do not add commentary.";

/// Configuration for the OpenAI-compatible backend.
///
/// The API key is deliberately absent: it is read from the environment at
/// construction and never persisted to config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of the chat-completions API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Upper bound on reply tokens.
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_tokens: 500,
        }
    }
}

/// Vision backend talking to an OpenAI-compatible chat-completions API.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
    api_key: String,
}

impl OpenAiBackend {
    /// Create a backend, reading the API key from the environment.
    ///
    /// Returns `MissingApiKey` when neither variable is set; callers are
    /// expected to degrade to a text-only pipeline rather than abort.
    pub fn from_env(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(API_KEY_ENV_FALLBACK))
            .map_err(|_| VisionError::MissingApiKey)?;
        Self::new(config, api_key)
    }

    /// Create a backend with an explicit key.
    pub fn new(config: OpenAiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VisionError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionBackend for OpenAiBackend {
    async fn extract_fields(&self, image: &[u8], mime: &str) -> Result<VisionFields> {
        let data_url = format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(image));

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Requesting field extraction from {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Vision API returned {}: {}", status, message);
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(VisionError::EmptyReply)?;

        Ok(parse_reply(&content))
    }

    fn name(&self) -> &str {
        "vision-ocr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        let result = OpenAiBackend::new(OpenAiConfig::default(), "  ");
        assert!(matches!(result, Err(VisionError::MissingApiKey)));
    }

    #[test]
    fn test_content_part_serialization() {
        let part = ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/png;base64,AAAA".to_string(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/png;base64,AAAA");
    }
}
