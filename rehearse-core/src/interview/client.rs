//! Shared handle to the configured language model

use std::sync::Arc;
use std::time::Duration;

use rehearse_models::{ChatRequest, Error as ModelError, Message, ModelProvider};
use tracing::debug;

/// Limit on a single model call unless configured otherwise
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// A provider bound to a model name and sampling settings
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn ModelProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Give up on a call after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion and return its trimmed text
    ///
    /// A blank completion is reported as `EmptyResponse`; a call still
    /// running after the configured timeout is dropped and reported as
    /// `Timeout`.
    pub async fn complete(&self, messages: Vec<Message>) -> Result<String, ModelError> {
        let mut request = ChatRequest::new(self.model.clone(), messages);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            "model call"
        );
        let response = tokio::time::timeout(self.timeout, self.provider.chat(request))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;
        let text = response.content.into_text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}
