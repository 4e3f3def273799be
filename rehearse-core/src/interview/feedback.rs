//! Narrative end-of-interview coaching

use tracing::warn;

use super::{ModelClient, prompts};
use crate::session::Exchange;

/// Returned when no answer was scored
pub const NO_ANSWERS_FEEDBACK: &str = "No questions were answered during this interview.";

/// Returned when the feedback call fails
pub const FEEDBACK_FALLBACK: &str =
    "Overall feedback could not be generated right now. Your per-question scores are still available.";

/// Writes the coaching summary shown after an interview
#[derive(Clone)]
pub struct FeedbackWriter {
    client: ModelClient,
}

impl FeedbackWriter {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Summarize scored exchanges
    ///
    /// With no exchanges the model is not called.
    pub async fn write(
        &self,
        role: &str,
        experience: &str,
        exchanges: &[Exchange<'_>],
        avg_score: f64,
    ) -> String {
        if exchanges.is_empty() {
            return NO_ANSWERS_FEEDBACK.to_string();
        }
        let messages = prompts::overall_feedback(role, experience, exchanges, avg_score);
        match self.client.complete(messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "overall feedback generation failed, using fallback");
                FEEDBACK_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Answer, Confidence, Question, Verdict};
    use rehearse_models::{Error as ModelError, ScriptedProvider};
    use std::sync::Arc;

    fn writer(provider: Arc<ScriptedProvider>) -> FeedbackWriter {
        FeedbackWriter::new(ModelClient::new(provider, "test-model"))
    }

    #[tokio::test]
    async fn no_exchanges_skips_model() {
        let provider = Arc::new(ScriptedProvider::new());
        let text = writer(provider.clone()).write("SWE", "Junior", &[], 0.0).await;
        assert_eq!(text, NO_ANSWERS_FEEDBACK);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_model_summary() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.reply("**Summary of Your Interview Performance**\nGood start.");

        let question = Question::generated("Q1");
        let answer = Answer::new("A1");
        let verdict = Verdict {
            score: 6,
            reason: "ok".into(),
            confidence: Confidence::Medium,
            red_flag: String::new(),
        };
        let exchanges = [Exchange {
            question: &question,
            answer: &answer,
            verdict: &verdict,
        }];

        let text = writer(provider).write("SWE", "Junior", &exchanges, 6.0).await;
        assert!(text.contains("Good start."));
    }

    #[tokio::test]
    async fn failure_returns_fallback() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.fail(ModelError::ProviderApi("500".into()));

        let question = Question::generated("Q1");
        let answer = Answer::new("A1");
        let verdict = Verdict::zero("none", "");
        let exchanges = [Exchange {
            question: &question,
            answer: &answer,
            verdict: &verdict,
        }];

        let text = writer(provider).write("SWE", "Junior", &exchanges, 0.0).await;
        assert_eq!(text, FEEDBACK_FALLBACK);
    }
}
