//! Model-backed interview capabilities
//!
//! - [`QuestionGenerator`] asks the first and each follow-up question
//! - [`AnswerEvaluator`] scores one answer against the [`Rubric`]
//! - [`FeedbackWriter`] writes the closing coaching summary
//!
//! All three absorb model failures and return a usable fallback value.

mod client;
mod evaluator;
mod feedback;
mod generator;
mod prompts;
mod rubric;
pub mod text;

pub use client::{DEFAULT_MODEL_TIMEOUT, ModelClient};
pub use evaluator::{AnswerEvaluator, COPY_THRESHOLD, HIGH_CONFIDENCE_MIN_WORDS, MAX_REASON_WORDS};
pub use feedback::{FEEDBACK_FALLBACK, FeedbackWriter, NO_ANSWERS_FEEDBACK};
pub use generator::{
    FIRST_QUESTION_FALLBACK, NEXT_QUESTION_FALLBACK, QuestionGenerator, conversation_history,
};
pub use rubric::{Band, RUBRIC_VERSION, Rubric};
