//! Interview session records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session
///
/// `Active` moves to `Completed` exactly once; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the evaluator is about a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    /// Case-insensitive; accepts "high confidence" style suffixes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let word = normalized
            .strip_suffix("confidence")
            .unwrap_or(&normalized)
            .trim();
        match word {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            other => Err(format!("unknown confidence level: {other:?}")),
        }
    }
}

/// A question asked by the interviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Always true today: every question comes from the model
    pub from_model: bool,
}

impl Question {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            from_model: true,
        }
    }
}

/// A candidate's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Structured score for a single answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Rubric score in `0..=10`
    pub score: u8,
    pub reason: String,
    pub confidence: Confidence,
    /// Empty when nothing suspicious was noticed
    pub red_flag: String,
}

impl Verdict {
    /// Highest score the rubric allows
    pub const MAX_SCORE: u8 = 10;

    /// A zero score with low confidence
    pub fn zero(reason: impl Into<String>, red_flag: impl Into<String>) -> Self {
        Self {
            score: 0,
            reason: reason.into(),
            confidence: Confidence::Low,
            red_flag: red_flag.into(),
        }
    }
}

/// One answered exchange: the question, the answer and its score
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange<'a> {
    pub question: &'a Question,
    pub answer: &'a Answer,
    pub verdict: &'a Verdict,
}

/// One interview attempt
///
/// `turns`, `responses` and `evaluations` are index-aligned: response *i*
/// answers turn *i* and evaluation *i* scores response *i*. At most one
/// turn is waiting for its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub owner_uid: String,
    pub owner_email: Option<String>,
    pub role: String,
    pub experience_level: String,
    pub target_question_count: u32,
    pub turns: Vec<Question>,
    pub responses: Vec<Answer>,
    pub evaluations: Vec<Verdict>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub overall_feedback: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A new active session holding its first question
    ///
    /// The id stays empty until the store assigns one.
    pub fn begin(
        owner_uid: impl Into<String>,
        owner_email: Option<String>,
        role: impl Into<String>,
        experience_level: impl Into<String>,
        target_question_count: u32,
        first_question: Question,
    ) -> Self {
        Self {
            id: String::new(),
            owner_uid: owner_uid.into(),
            owner_email,
            role: role.into(),
            experience_level: experience_level.into(),
            target_question_count,
            turns: vec![first_question],
            responses: Vec::new(),
            evaluations: Vec::new(),
            status: SessionStatus::Active,
            created_at: Utc::now(),
            ended_at: None,
            overall_feedback: None,
            updated_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_uid == uid
    }

    /// The question waiting for an answer, if any
    pub fn pending_question(&self) -> Option<&Question> {
        self.turns.get(self.responses.len())
    }

    /// Whether the answer count has reached the target
    pub fn target_reached(&self) -> bool {
        self.responses.len() >= self.target_question_count as usize
    }

    /// Fully answered and scored exchanges, in order
    pub fn exchanges(&self) -> impl Iterator<Item = Exchange<'_>> {
        self.turns
            .iter()
            .zip(&self.responses)
            .zip(&self.evaluations)
            .map(|((question, answer), verdict)| Exchange {
                question,
                answer,
                verdict,
            })
    }

    /// Sum of all scores
    pub fn total_score(&self) -> u32 {
        self.evaluations.iter().map(|v| u32::from(v.score)).sum()
    }

    /// Mark the session completed
    ///
    /// `ended_at` is re-stamped on every call.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.ended_at = Some(now);
    }

    /// Check index alignment and bounds
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.target_question_count == 0 {
            return Err("target question count must be at least 1".to_string());
        }
        if self.evaluations.len() != self.responses.len() {
            return Err(format!(
                "{} evaluations for {} answers",
                self.evaluations.len(),
                self.responses.len()
            ));
        }
        if self.responses.len() > self.turns.len() {
            return Err(format!(
                "{} answers for {} questions",
                self.responses.len(),
                self.turns.len()
            ));
        }
        if self.turns.len() > self.target_question_count as usize + 1 {
            return Err(format!(
                "{} questions exceed target of {}",
                self.turns.len(),
                self.target_question_count
            ));
        }
        if let Some(v) = self.evaluations.iter().find(|v| v.score > Verdict::MAX_SCORE) {
            return Err(format!("score {} out of range", v.score));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(score: u8) -> Verdict {
        Verdict {
            score,
            reason: "ok".into(),
            confidence: Confidence::Medium,
            red_flag: String::new(),
        }
    }

    fn session(target: u32) -> Session {
        Session::begin(
            "alice",
            Some("alice@example.com".into()),
            "Backend Engineer",
            "3 years",
            target,
            Question::generated("What is a mutex?"),
        )
    }

    #[test]
    fn begin_creates_active_session_with_first_question() {
        let s = session(3);
        assert!(s.is_active());
        assert_eq!(s.turns.len(), 1);
        assert!(s.responses.is_empty());
        assert!(s.turns[0].from_model);
        assert_eq!(s.pending_question().unwrap().text, "What is a mutex?");
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn pending_question_none_when_all_answered() {
        let mut s = session(1);
        s.responses.push(Answer::new("A lock."));
        s.evaluations.push(verdict(5));
        assert!(s.pending_question().is_none());
        assert!(s.target_reached());
    }

    #[test]
    fn exchanges_stop_at_shortest_sequence() {
        let mut s = session(3);
        s.responses.push(Answer::new("first"));
        s.evaluations.push(verdict(7));
        s.turns.push(Question::generated("Q2"));

        let exchanges: Vec<_> = s.exchanges().collect();
        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].answer.text, "first");
        assert_eq!(exchanges[0].verdict.score, 7);
    }

    #[test]
    fn complete_sets_status_and_end_time() {
        let mut s = session(2);
        let now = Utc::now();
        s.complete(now);
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.ended_at, Some(now));
    }

    #[test]
    fn invariants_reject_misaligned_evaluations() {
        let mut s = session(2);
        s.responses.push(Answer::new("answer"));
        assert!(s.check_invariants().unwrap_err().contains("evaluations"));
    }

    #[test]
    fn invariants_reject_too_many_questions() {
        let mut s = session(1);
        s.turns.push(Question::generated("Q2"));
        s.turns.push(Question::generated("Q3"));
        assert!(s.check_invariants().is_err());
    }

    #[test]
    fn invariants_reject_out_of_range_score() {
        let mut s = session(2);
        s.responses.push(Answer::new("answer"));
        s.evaluations.push(verdict(11));
        assert!(s.check_invariants().unwrap_err().contains("out of range"));
    }

    #[test]
    fn total_score_sums_evaluations() {
        let mut s = session(3);
        for score in [4, 6] {
            s.turns.push(Question::generated("Q"));
            s.responses.push(Answer::new("A"));
            s.evaluations.push(verdict(score));
        }
        assert_eq!(s.total_score(), 10);
    }

    #[test]
    fn confidence_parses_loosely() {
        assert_eq!("High".parse::<Confidence>(), Ok(Confidence::High));
        assert_eq!(" medium ".parse::<Confidence>(), Ok(Confidence::Medium));
        assert_eq!("Low Confidence".parse::<Confidence>(), Ok(Confidence::Low));
        assert!("certain".parse::<Confidence>().is_err());
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
