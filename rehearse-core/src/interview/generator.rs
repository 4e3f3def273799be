//! Question generation

use rehearse_models::Message;
use tracing::warn;

use super::{ModelClient, prompts};
use crate::session::{Answer, Question};

/// Returned when the first question cannot be generated
pub const FIRST_QUESTION_FALLBACK: &str =
    "Tell me about a recent project you worked on and the technical decisions you made.";

/// Returned when a follow-up question cannot be generated
pub const NEXT_QUESTION_FALLBACK: &str =
    "Describe a difficult technical problem you solved and how you approached it.";

/// Produces interview questions
///
/// Never fails: when the model call fails the failure is logged and a fixed
/// fallback question is returned so the interview can continue.
#[derive(Clone)]
pub struct QuestionGenerator {
    client: ModelClient,
}

impl QuestionGenerator {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Opening question for a role and experience level
    pub async fn first_question(&self, role: &str, experience: &str) -> String {
        match self
            .client
            .complete(prompts::first_question(role, experience))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, role, "first question generation failed, using fallback");
                FIRST_QUESTION_FALLBACK.to_string()
            }
        }
    }

    /// Follow-up question given the conversation so far
    pub async fn next_question(
        &self,
        role: &str,
        experience: &str,
        history: Vec<Message>,
    ) -> String {
        match self
            .client
            .complete(prompts::next_question(role, experience, history))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, role, "next question generation failed, using fallback");
                NEXT_QUESTION_FALLBACK.to_string()
            }
        }
    }
}

/// Interleave questions and answers in conversational order, ending with
/// the answer that was just submitted
pub fn conversation_history(
    turns: &[Question],
    responses: &[Answer],
    latest_answer: &str,
) -> Vec<Message> {
    let mut history = Vec::with_capacity(turns.len() + responses.len() + 1);
    for (i, question) in turns.iter().enumerate() {
        history.push(Message::assistant(question.text.as_str()));
        if let Some(answer) = responses.get(i) {
            history.push(Message::user(answer.text.as_str()));
        }
    }
    history.push(Message::user(latest_answer));
    history
}
