use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::CompletionConfig;
use crate::error::{Result, TranslatorError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelEntry {
    id: String,
}

/// A text-completion backend answering one prompt at a time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `prompt` and return the text of the first choice
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints
pub struct OpenAiClient {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self { client: builder.build()?, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    /// Check that the service answers and lists the configured model
    pub async fn check_availability(&self) -> Result<()> {
        let url = self.endpoint("/v1/models");

        let response = self.client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| TranslatorError::Transport(format!("Failed to connect to {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::Api { status: status.as_u16(), body });
        }

        let models: ModelList = response.json().await
            .map_err(|e| TranslatorError::Decode(format!("Failed to parse model list: {}", e)))?;

        if models.data.iter().any(|m| m.id == self.config.model) {
            info!("Completion model '{}' is available", self.config.model);
            Ok(())
        } else {
            Err(TranslatorError::Config(format!(
                "Model '{}' is not offered by {}",
                self.config.model, self.config.host
            )))
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let url = self.endpoint("/v1/chat/completions");
        debug!("Sending completion request to: {}", url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslatorError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranslatorError::Api { status: status.as_u16(), body });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| TranslatorError::Decode(format!("Failed to parse completion response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(TranslatorError::EmptyResponse)
    }
}
