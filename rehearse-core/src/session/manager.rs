//! SessionManager: the interview state machine
//!
//! Every mutating operation runs under a per-key lock for its whole
//! read-evaluate-generate-write cycle, so concurrent requests against one
//! session cannot break the alignment of questions, answers and scores.
//! Model calls happen inside the lock, one at a time: the answer is always
//! scored before the next question is generated.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Answer, InterviewSettings, Question, Session, SessionLocks, Verdict};
use crate::auth::Identity;
use crate::error::SessionError;
use crate::interview::text::round1;
use crate::interview::{
    AnswerEvaluator, FeedbackWriter, ModelClient, QuestionGenerator, conversation_history,
};
use crate::store::records::field;
use crate::store::{DocumentStore, SessionRepository};

/// Parameters for a new interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub role: String,
    pub experience: String,
    pub num_questions: u32,
}

/// A freshly started session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedSession {
    pub session_id: String,
    pub first_question: String,
}

/// Result of submitting one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    /// `None` once the target number of answers is reached
    pub next_question: Option<String>,
    pub verdict: Verdict,
    /// Whether this answer completed the session
    pub completed: bool,
}

/// One line of the redacted transcript: no rationale, only the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub question: String,
    pub user_answer: String,
    pub score: u8,
}

/// Closing report for a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    /// Mean score, one decimal place; 0.0 with no answers
    pub avg_score: f64,
    pub per_question_scores: Vec<u8>,
    pub overall_feedback: String,
    pub transcript: Vec<TranscriptLine>,
}

/// Runs interview sessions
pub struct SessionManager {
    repo: SessionRepository,
    generator: QuestionGenerator,
    evaluator: AnswerEvaluator,
    feedback: FeedbackWriter,
    locks: SessionLocks,
    settings: InterviewSettings,
}

impl SessionManager {
    pub fn new(store: Arc<dyn DocumentStore>, client: ModelClient) -> Self {
        Self {
            repo: SessionRepository::new(store),
            generator: QuestionGenerator::new(client.clone()),
            evaluator: AnswerEvaluator::new(client.clone()),
            feedback: FeedbackWriter::new(client),
            locks: SessionLocks::new(),
            settings: InterviewSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: InterviewSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Start a new session for `owner`
    ///
    /// Any session the owner still has active is completed first, so at most
    /// one session per owner is ever active.
    pub async fn start(
        &self,
        owner: &Identity,
        request: StartRequest,
    ) -> Result<StartedSession, SessionError> {
        self.validate_start(&request)?;

        let _owner_guard = self.locks.owner(&owner.uid).await;
        self.close_active_sessions(&owner.uid).await?;

        let first_question = self
            .generator
            .first_question(&request.role, &request.experience)
            .await;

        let mut session = Session::begin(
            owner.uid.clone(),
            owner.email.clone(),
            request.role,
            request.experience,
            request.num_questions,
            Question::generated(first_question.clone()),
        );
        let session_id = self.repo.insert(&mut session).await?;
        info!(
            session_id = %session_id,
            owner = %owner.uid,
            target = session.target_question_count,
            "session started"
        );

        Ok(StartedSession {
            session_id,
            first_question,
        })
    }

    /// Score an answer and, unless the target is reached, ask the next question
    ///
    /// A blank `question_text` falls back to the question waiting for an
    /// answer.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        requester: &str,
        question_text: &str,
        answer_text: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let _guard = self.locks.session(session_id).await;
        let mut session = self.repo.load(session_id).await?;
        authorize(&session, requester, true)?;

        let pending = session.pending_question().ok_or_else(|| {
            SessionError::InvalidRequest(
                "every question in this session has already been answered".to_string(),
            )
        })?;
        let question = if question_text.trim().is_empty() {
            pending.text.clone()
        } else {
            question_text.to_string()
        };

        let verdict = self
            .evaluator
            .evaluate(
                &session.role,
                &session.experience_level,
                &question,
                answer_text,
            )
            .await;
        debug!(session_id, score = verdict.score, "answer scored");

        let history = conversation_history(&session.turns, &session.responses, answer_text);
        session.responses.push(Answer::new(answer_text));
        session.evaluations.push(verdict.clone());

        if session.target_reached() {
            let mut changed = vec![field::ANSWERS, field::EVALUATION];
            let completed = self.settings.auto_complete;
            if completed {
                session.complete(Utc::now());
                changed.extend([field::STATUS, field::ENDED_AT]);
            }
            self.repo.save(&mut session, &changed).await?;
            info!(session_id, completed, "final answer recorded");
            return Ok(AnswerOutcome {
                next_question: None,
                verdict,
                completed,
            });
        }

        let next_question = self
            .generator
            .next_question(&session.role, &session.experience_level, history)
            .await;
        session
            .turns
            .push(Question::generated(next_question.clone()));
        self.repo
            .save(
                &mut session,
                &[field::ANSWERS, field::EVALUATION, field::QUESTIONS],
            )
            .await?;

        Ok(AnswerOutcome {
            next_question: Some(next_question),
            verdict,
            completed: false,
        })
    }

    /// Complete a session
    ///
    /// Allowed on sessions that are already completed; `ended_at` is
    /// re-stamped each time.
    pub async fn end(&self, session_id: &str, requester: &str) -> Result<(), SessionError> {
        let _guard = self.locks.session(session_id).await;
        let mut session = self.repo.load(session_id).await?;
        authorize(&session, requester, false)?;

        session.complete(Utc::now());
        self.repo
            .save(&mut session, &[field::STATUS, field::ENDED_AT])
            .await?;
        info!(session_id, "session ended");
        Ok(())
    }

    /// Score summary plus narrative feedback; completes the session
    pub async fn finalize_with_feedback(
        &self,
        session_id: &str,
        requester: &str,
    ) -> Result<FinalReport, SessionError> {
        let _guard = self.locks.session(session_id).await;
        let mut session = self.repo.load(session_id).await?;
        authorize(&session, requester, false)?;

        let (per_question_scores, transcript, avg_score, overall_feedback) = {
            let exchanges: Vec<_> = session.exchanges().collect();
            let scores: Vec<u8> = exchanges.iter().map(|e| e.verdict.score).collect();
            let avg_score = if scores.is_empty() {
                0.0
            } else {
                let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
                round1(f64::from(sum) / scores.len() as f64)
            };
            let transcript = exchanges
                .iter()
                .map(|e| TranscriptLine {
                    question: e.question.text.clone(),
                    user_answer: e.answer.text.clone(),
                    score: e.verdict.score,
                })
                .collect::<Vec<_>>();
            let feedback = self
                .feedback
                .write(
                    &session.role,
                    &session.experience_level,
                    &exchanges,
                    avg_score,
                )
                .await;
            (scores, transcript, avg_score, feedback)
        };

        let now = Utc::now();
        if session.is_active() {
            session.complete(now);
        } else if session.ended_at.is_none() {
            session.ended_at = Some(now);
        }
        session.overall_feedback = Some(overall_feedback.clone());
        self.repo
            .save(
                &mut session,
                &[field::STATUS, field::ENDED_AT, field::OVERALL_FEEDBACK],
            )
            .await?;
        info!(session_id, avg_score, "session finalized");

        Ok(FinalReport {
            avg_score,
            per_question_scores,
            overall_feedback,
            transcript,
        })
    }

    /// Full session for its owner, in any state
    pub async fn get(&self, session_id: &str, requester: &str) -> Result<Session, SessionError> {
        let session = self.repo.load(session_id).await?;
        authorize(&session, requester, false)?;
        Ok(session)
    }

    fn validate_start(&self, request: &StartRequest) -> Result<(), SessionError> {
        if request.role.trim().is_empty() {
            return Err(SessionError::InvalidRequest("role must not be empty".into()));
        }
        if request.experience.trim().is_empty() {
            return Err(SessionError::InvalidRequest(
                "experience must not be empty".into(),
            ));
        }
        if request.num_questions < 1 {
            return Err(SessionError::InvalidRequest(
                "num_questions must be at least 1".into(),
            ));
        }
        if request.num_questions > self.settings.max_question_count {
            return Err(SessionError::InvalidRequest(format!(
                "num_questions must be at most {}",
                self.settings.max_question_count
            )));
        }
        Ok(())
    }

    async fn close_active_sessions(&self, uid: &str) -> Result<usize, SessionError> {
        let mut closed = 0;
        for stale in self.repo.active_for_owner(uid).await? {
            let _guard = self.locks.session(&stale.id).await;
            let mut current = self.repo.load(&stale.id).await?;
            if !current.is_active() {
                continue;
            }
            current.complete(Utc::now());
            self.repo
                .save(&mut current, &[field::STATUS, field::ENDED_AT])
                .await?;
            info!(session_id = %current.id, owner = uid, "closed previously active session");
            closed += 1;
        }
        Ok(closed)
    }
}

/// Ownership first, then activity when required
fn authorize(session: &Session, requester: &str, require_active: bool) -> Result<(), SessionError> {
    if !session.is_owned_by(requester) {
        return Err(SessionError::not_owner(&session.id));
    }
    if require_active && !session.is_active() {
        return Err(SessionError::inactive(&session.id));
    }
    Ok(())
}
