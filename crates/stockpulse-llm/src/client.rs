use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::LlmError;
use crate::model::ChatModel;
use crate::retry::retry_with_backoff;

/// One system + user prompt pair that expects a JSON object back.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: ChatModel,
    pub system: String,
    pub user: String,
    pub temperature: f64,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(model: ChatModel, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model,
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Produces a parsed JSON object for a prompt. Implementations own transport,
/// retries and timeouts; callers own interpretation of the object.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LlmError`] when the service cannot be reached, rejects the
    /// request, or replies with something that is not a JSON document.
    async fn complete_json(&self, request: &CompletionRequest) -> Result<Value, LlmError>;
}

/// Client for an OpenAI-compatible `chat/completions` endpoint in JSON mode.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_retries,
            backoff_base_ms,
        })
    }

    async fn send_once(&self, body: &Value) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let envelope: Value = response.json().await?;
        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        serde_json::from_str(content).map_err(|source| LlmError::Deserialize {
            context: "completion message content".to_string(),
            source,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete_json(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        let body = json!({
            "model": request.model.as_str(),
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
            "response_format": { "type": "json_object" },
        });

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || self.send_once(&body)).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
