//! Language model access for rehearse.
//!
//! This crate provides:
//! - A provider trait giving every backend the same chat interface
//! - Hosted (Gemini) and local (Ollama) provider implementations
//! - A scripted provider for deterministic tests
//! - Credential management for API keys
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 dyn ModelProvider                    │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  │
//! │  │   Gemini    │  │   Ollama    │  │  Scripted   │  │
//! │  │  Provider   │  │  Provider   │  │  Provider   │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  CredentialStore                     │
//! │         (System Keyring + Env Fallback)             │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;

pub mod auth;
pub mod providers;

pub use error::{Error, Result};
pub use providers::{
    ChatRequest, ChatResponse, Content, GeminiProvider, Message, ModelProvider, OllamaProvider,
    Role, ScriptedProvider, StopReason, Usage,
};
