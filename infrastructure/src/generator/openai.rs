//! OpenAI-compatible chat-completions generator

use super::prompt;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use tripvote_application::{ContentGenerator, GenerationRequest, GeneratorError};
use tripvote_domain::ItemDetails;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const TEMPERATURE: f64 = 0.8;

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Generates items through any endpoint speaking the chat-completions API.
pub struct OpenAiContentGenerator {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiContentGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GeneratorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeneratorError::NotConfigured("missing API key".to_string()));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GeneratorError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: model.into(),
            timeout: Duration::from_secs(60),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt::system_prompt(request) },
                { "role": "user", "content": prompt::user_prompt(request) },
            ],
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::RequestFailed(format!(
                "API returned {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GeneratorError::Malformed("response has no message content".to_string()))
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ItemDetails>, GeneratorError> {
        debug!(
            "Requesting {} {} item(s) from {}",
            request.count, request.stage, self.model
        );
        let content = tokio::time::timeout(self.timeout, self.complete(request))
            .await
            .map_err(|_| GeneratorError::Timeout)??;

        prompt::parse_items(request.stage, &content).inspect_err(|e| {
            warn!("Discarding {} response from {}: {}", request.stage, self.model, e);
        })
    }
}
