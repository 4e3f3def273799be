//! Ollama local model provider.
//!
//! Connects to a local Ollama instance for running models like Llama or Mistral.
//!
//! # Example
//!
//! ```ignore
//! use rehearse_models::providers::OllamaProvider;
//!
//! let provider = OllamaProvider::new();  // Uses localhost:11434
//! let provider = OllamaProvider::with_base_url("http://192.168.1.100:11434");
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatRequest, ChatResponse, Content, ModelProvider, Role, StopReason, Usage};
use crate::{Error, Result};

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

// ────────────────────────────────────────────────────────────────────────────
// Ollama API Types
// ────────────────────────────────────────────────────────────────────────────

/// Message in an Ollama chat request/response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for Ollama's `/api/chat` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaChatOptions>,
}

/// Sampling options for Ollama.
#[derive(Debug, Serialize)]
pub struct OllamaChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Response from Ollama's `/api/chat` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    pub message: OllamaChatMessage,
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl From<OllamaChatResponse> for ChatResponse {
    fn from(response: OllamaChatResponse) -> Self {
        let stop_reason = match response.done_reason.as_deref() {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };
        Self {
            content: Content::text(response.message.content),
            stop_reason,
            usage: Usage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        }
    }
}

impl From<&ChatRequest> for OllamaChatRequest {
    fn from(request: &ChatRequest) -> Self {
        let messages = request
            .messages
            .iter()
            .map(|m| OllamaChatMessage {
                role: match m.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: m.content.as_text().to_string(),
            })
            .collect();

        let options = if request.temperature.is_some()
            || request.max_tokens.is_some()
            || request.stop.is_some()
        {
            Some(OllamaChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
                stop: request.stop.clone(),
            })
        } else {
            None
        };

        Self {
            model: request.model.clone(),
            messages,
            stream: false,
            options,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OllamaProvider
// ────────────────────────────────────────────────────────────────────────────

/// Ollama local model provider.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default URL (localhost:11434).
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new Ollama provider with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest::from(&request);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "Ollama API returned {}: {}",
                status, body
            )));
        }

        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if ollama_response.message.content.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(ollama_response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;

    #[test]
    fn new_creates_provider_with_default_url() {
        let provider = OllamaProvider::new();
        assert_eq!(provider.base_url(), "http://localhost:11434");
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let provider = OllamaProvider::with_base_url("http://gpu-box:11434/");
        assert_eq!(provider.base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn request_conversion_maps_roles_and_options() {
        let request = ChatRequest::new(
            "llama3",
            vec![
                Message::system("be strict"),
                Message::assistant("Q1"),
                Message::user("A1"),
            ],
        )
        .temperature(0.1);

        let body = OllamaChatRequest::from(&request);
        let roles: Vec<_> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert!(!body.stream);
        assert_eq!(body.options.unwrap().temperature, Some(0.1));
    }

    #[test]
    fn request_without_sampling_settings_omits_options() {
        let request = ChatRequest::new("llama3", vec![Message::user("hi")]);
        let json = serde_json::to_value(OllamaChatRequest::from(&request)).unwrap();
        assert!(json.get("options").is_none());
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn parse_chat_response_extracts_content() {
        let json = r#"{
            "model": "llama3",
            "created_at": "2024-01-15T10:00:00Z",
            "message": {
                "role": "assistant",
                "content": "Explain the difference between a process and a thread."
            },
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 10,
            "eval_count": 15
        }"#;

        let response: OllamaChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.done);

        let response: ChatResponse = response.into();
        assert_eq!(
            response.content.as_text(),
            "Explain the difference between a process and a thread."
        );
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 15);
    }

    #[test]
    fn length_done_reason_maps_to_max_tokens() {
        let json = r#"{
            "model": "llama3",
            "message": {"role": "assistant", "content": "partial"},
            "done": true,
            "done_reason": "length"
        }"#;
        let response: OllamaChatResponse = serde_json::from_str(json).unwrap();
        let response: ChatResponse = response.into();
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
    }

    /// Check if Ollama is available at the given URL.
    async fn ollama_available(base_url: &str) -> bool {
        let client = reqwest::Client::new();
        client
            .get(format!("{}/api/tags", base_url))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
            .is_ok()
    }

    #[tokio::test]
    #[ignore = "requires Ollama running locally with a model installed"]
    async fn integration_chat_sends_request_to_ollama() {
        let base_url =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string());

        if !ollama_available(&base_url).await {
            eprintln!("Skipping: Ollama not available at {}", base_url);
            return;
        }

        let provider = OllamaProvider::with_base_url(&base_url);
        let request = ChatRequest::new(model, vec![Message::user("Say 'hello' and nothing else.")]);

        let response = provider.chat(request).await.expect("chat should succeed");
        assert!(!response.content.as_text().is_empty());
    }
}
