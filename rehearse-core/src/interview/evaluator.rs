//! Answer scoring
//!
//! [`AnswerEvaluator::evaluate`] always yields a well-formed [`Verdict`].
//! Obvious non-answers are scored locally without a model call; everything
//! else is sent to the model and the reply is parsed, clamped and capped.
//! A failed call or an unparseable reply becomes a zero, low-confidence
//! verdict with a red flag.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::text::{strip_code_fence, truncate_words, word_count, word_overlap};
use super::{ModelClient, Rubric, prompts};
use crate::session::{Confidence, Verdict};

/// Answers at least this similar to the question score 0
pub const COPY_THRESHOLD: f64 = 0.8;

/// Answers shorter than this never get `High` confidence
pub const HIGH_CONFIDENCE_MIN_WORDS: usize = 15;

/// Upper bound on the stored reason
pub const MAX_REASON_WORDS: usize = 120;

/// Model reply before validation
#[derive(Debug, Deserialize)]
struct RawVerdict {
    score: Value,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    confidence: String,
    #[serde(default)]
    red_flag: Option<String>,
}

/// Scores answers against the rubric
#[derive(Clone)]
pub struct AnswerEvaluator {
    client: ModelClient,
    rubric: Rubric,
}

impl AnswerEvaluator {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            rubric: Rubric::default(),
        }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub async fn evaluate(
        &self,
        role: &str,
        experience: &str,
        question: &str,
        answer: &str,
    ) -> Verdict {
        if let Some(verdict) = precheck(question, answer) {
            debug!(red_flag = %verdict.red_flag, "answer rejected before model call");
            return verdict;
        }

        let messages = prompts::evaluation(&self.rubric, role, experience, question, answer);
        let reply = match self.client.complete(messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "answer evaluation failed, scoring zero");
                let reason = truncate_words(&format!("Evaluation failed: {e}"), MAX_REASON_WORDS);
                return Verdict::zero(reason, "Internal error occurred.");
            }
        };

        match parse_verdict(&reply) {
            Ok(verdict) => apply_guardrails(verdict, answer),
            Err(e) => {
                warn!(error = %e, "evaluator returned unparseable output, scoring zero");
                Verdict::zero(
                    "Invalid response format from the evaluator.",
                    "Invalid response format.",
                )
            }
        }
    }
}

/// Local checks that decide the verdict without asking the model
fn precheck(question: &str, answer: &str) -> Option<Verdict> {
    if word_count(answer) == 0 {
        return Some(Verdict::zero("No answer was provided.", "Empty answer."));
    }
    if word_overlap(question, answer) >= COPY_THRESHOLD {
        return Some(Verdict::zero(
            "The answer repeats the question instead of answering it.",
            "Answer copied from the question.",
        ));
    }
    None
}

fn coerce_score(value: &Value) -> Result<u8, String> {
    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("score {n} is not numeric"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("score {s:?} is not numeric"))?,
        other => return Err(format!("score has unexpected type: {other}")),
    };
    if !number.is_finite() {
        return Err("score is not finite".to_string());
    }
    Ok(number.round().clamp(0.0, f64::from(Verdict::MAX_SCORE)) as u8)
}

/// Parse a model reply into a verdict
pub(crate) fn parse_verdict(reply: &str) -> Result<Verdict, String> {
    let raw: RawVerdict =
        serde_json::from_str(strip_code_fence(reply)).map_err(|e| e.to_string())?;
    let score = coerce_score(&raw.score)?;
    let confidence = raw.confidence.parse().unwrap_or(Confidence::Low);
    Ok(Verdict {
        score,
        reason: raw.reason.trim().to_string(),
        confidence,
        red_flag: raw.red_flag.unwrap_or_default().trim().to_string(),
    })
}

/// Enforce the confidence and length rules on a model verdict
pub(crate) fn apply_guardrails(mut verdict: Verdict, answer: &str) -> Verdict {
    if verdict.confidence == Confidence::High && word_count(answer) < HIGH_CONFIDENCE_MIN_WORDS {
        verdict.confidence = Confidence::Medium;
    }
    verdict.reason = truncate_words(&verdict.reason, MAX_REASON_WORDS);
    verdict
}
