use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompts::build_summary_prompt;

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";

/// Configuration for the DeepSeek chat-completions client
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    /// API key (from DEEPSEEK_API_KEY env var)
    pub api_key: String,
    /// Chat-completions endpoint
    pub api_url: String,
    /// Model to use (e.g., "deepseek-chat")
    pub model: String,
    /// Temperature (0-1)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl DeepSeekConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .context("DEEPSEEK_API_KEY environment variable not set")?;
        let api_url =
            std::env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            api_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// DeepSeek API client
pub struct DeepSeekClient {
    client: Client,
    config: DeepSeekConfig,
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Summarize a rendered session transcript
    pub async fn summarize(&self, transcript: &str, additional_context: &str) -> Result<String> {
        let prompt = build_summary_prompt(transcript, additional_context);
        self.chat(&prompt).await
    }

    /// Send a single user message and return the assistant's reply
    pub async fn chat(&self, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to summarizer API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Summarizer API error: {} - {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse summarizer API response")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("No choices in summarizer response")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
