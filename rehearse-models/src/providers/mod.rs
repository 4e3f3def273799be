//! Model provider trait and implementations.
//!
//! The [`ModelProvider`] trait is the single seam between rehearse and a
//! language model: a list of messages goes in, one completion comes out.
//!
//! # Example
//!
//! ```ignore
//! use rehearse_models::providers::{ChatRequest, Message, ModelProvider};
//!
//! async fn ask(provider: &dyn ModelProvider) -> rehearse_models::Result<String> {
//!     let request = ChatRequest::new("gemini-2.0-flash", vec![Message::user("Hello!")]);
//!     let response = provider.chat(request).await?;
//!     Ok(response.content.into_text())
//! }
//! ```

mod gemini;
mod ollama;
mod scripted;
mod types;

use async_trait::async_trait;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use scripted::ScriptedProvider;
pub use types::*;

use crate::Result;

/// Trait for model providers (hosted and local).
///
/// Implementations perform exactly one completion per call and never retry;
/// callers decide how to degrade when a call fails.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider name (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Perform a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
