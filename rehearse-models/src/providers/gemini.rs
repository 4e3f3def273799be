//! Google Gemini hosted model provider.
//!
//! Talks to the Generative Language REST API (`generateContent`). System
//! messages are sent as `systemInstruction`; assistant turns use the
//! `model` role.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChatRequest, ChatResponse, Content, ModelProvider, Role, StopReason, Usage};
use crate::auth::ApiKey;
use crate::{Error, Result};

/// Default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ────────────────────────────────────────────────────────────────────────────
// Gemini API Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// Response body from `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,
}

impl From<&ChatRequest> for GeminiRequest {
    fn from(request: &ChatRequest) -> Self {
        let (system, rest) = request.split_system();

        let contents = rest
            .into_iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        Role::Assistant => "model",
                        Role::User | Role::System => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: m.content.as_text().to_string(),
                }],
            })
            .collect();

        let system_instruction = system.map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text }],
        });

        let generation_config = if request.temperature.is_some()
            || request.max_tokens.is_some()
            || request.stop.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                stop_sequences: request.stop.clone(),
            })
        } else {
            None
        };

        Self {
            contents,
            system_instruction,
            generation_config,
        }
    }
}

impl TryFrom<GeminiResponse> for ChatResponse {
    type Error = Error;

    fn try_from(response: GeminiResponse) -> Result<Self> {
        let usage = response
            .usage_metadata
            .map(|u| Usage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse)?;

        let stop_reason = match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT") => {
                StopReason::Filtered
            }
            _ => StopReason::EndTurn,
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(Self {
            content: Content::text(text),
            stop_reason,
            usage,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiProvider
// ────────────────────────────────────────────────────────────────────────────

/// Google Gemini provider.
pub struct GeminiProvider {
    api_key: ApiKey,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider against the public Gemini endpoint.
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom endpoint (proxies, emulators).
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint(&request.model);
        let body = GeminiRequest::from(&request);
        debug!(model = %request.model, turns = body.contents.len(), "sending gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %request.model, "gemini quota exhausted");
            return Err(Error::QuotaExceeded(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        gemini_response.try_into()
    }
}
