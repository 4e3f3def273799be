//! Scripted provider for tests and offline runs.
//!
//! Queue replies with [`ScriptedProvider::reply`] or [`ScriptedProvider::fail`]
//! before driving the code under test. Each `chat()` consumes one queued
//! reply, and every request is recorded for later inspection.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, Content, ModelProvider, StopReason, Usage};
use crate::{Error, Result};

/// Provider that answers from a queue of canned replies.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    fallback: Option<String>,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` whenever the queue is empty.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply.
    pub fn reply(&self, text: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(Ok(text.into()));
        self
    }

    /// Queue a failed call.
    pub fn fail(&self, error: Error) -> &Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Number of replies still queued.
    pub fn queued(&self) -> usize {
        lock(&self.replies).len()
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    /// Number of `chat()` calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        lock(&self.requests).push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = lock(&self.replies).pop_front();
        let text = match next {
            Some(reply) => reply?,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| Error::ProviderApi("no scripted reply queued".to_string()))?,
        };

        Ok(ChatResponse {
            usage: Usage::new(0, text.split_whitespace().count() as u64),
            content: Content::text(text),
            stop_reason: StopReason::EndTurn,
        })
    }
}
