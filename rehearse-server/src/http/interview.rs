//! Interview flow endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rehearse_core::interview::text::round1;
use rehearse_core::session::{Answer, Question, TranscriptLine};
use rehearse_core::{Identity, SessionStatus, StartRequest, Verdict};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub role: String,
    pub experience: String,
    pub num_questions: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    pub message: String,
    pub interview_id: String,
    pub first_question: String,
}

/// POST /interview/start
pub async fn start(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, ApiError> {
    let started = state
        .sessions
        .start(
            &identity,
            StartRequest {
                role: body.role,
                experience: body.experience,
                num_questions: body.num_questions,
            },
        )
        .await?;

    Ok(Json(StartInterviewResponse {
        message: "Interview started successfully".to_string(),
        interview_id: started.session_id,
        first_question: started.first_question,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub interview_id: String,
    #[serde(default)]
    pub question_text: String,
    pub answer_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub message: String,
    pub next_question: Option<String>,
    pub evaluation_feedback: Verdict,
    pub completed: bool,
}

/// POST /interview/answer
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let outcome = state
        .sessions
        .submit_answer(
            &body.interview_id,
            &identity.uid,
            &body.question_text,
            &body.answer_text,
        )
        .await?;

    let message = match (&outcome.next_question, outcome.completed) {
        (Some(_), _) => "Answer submitted and next question generated successfully",
        (None, true) => "Interview completed.",
        (None, false) => "All questions answered.",
    };

    Ok(Json(AnswerResponse {
        message: message.to_string(),
        next_question: outcome.next_question,
        evaluation_feedback: outcome.verdict,
        completed: outcome.completed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct InterviewRef {
    pub interview_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /interview/end
pub async fn end(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<InterviewRef>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.end(&body.interview_id, &identity.uid).await?;
    Ok(Json(MessageResponse {
        message: "Interview marked as completed and inactive.".to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverallFeedbackResponse {
    pub final_score: f64,
    pub per_question_scores: Vec<u8>,
    pub overall_feedback: String,
    pub questions: Vec<TranscriptLine>,
}

/// POST /interview/overall-feedback
pub async fn overall_feedback(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<InterviewRef>,
) -> Result<Json<OverallFeedbackResponse>, ApiError> {
    let report = state
        .sessions
        .finalize_with_feedback(&body.interview_id, &identity.uid)
        .await?;

    Ok(Json(OverallFeedbackResponse {
        final_score: report.avg_score,
        per_question_scores: report.per_question_scores,
        overall_feedback: report.overall_feedback,
        questions: report.transcript,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub id: String,
    pub role: String,
    pub experience: String,
    pub num_questions: u32,
    pub status: SessionStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// GET /user/interview/{id}
pub async fn metadata(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<SessionMetadata>, ApiError> {
    let session = state.sessions.get(&id, &identity.uid).await?;
    Ok(Json(SessionMetadata {
        is_active: session.is_active(),
        id: session.id,
        role: session.role,
        experience: session.experience_level,
        num_questions: session.target_question_count,
        status: session.status,
        created_at: session.created_at,
        ended_at: session.ended_at,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetail {
    pub role: String,
    pub experience: String,
    pub date: DateTime<Utc>,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub evaluations: Vec<Verdict>,
    /// Mean score per answer, absent before the first answer
    pub score: Option<f64>,
    pub overall_feedback: Option<String>,
}

/// GET /recent-interviews/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetail>, ApiError> {
    let session = state.sessions.get(&id, &identity.uid).await?;
    let answered = session.evaluations.len();
    let score =
        (answered > 0).then(|| round1(f64::from(session.total_score()) / answered as f64));

    Ok(Json(SessionDetail {
        role: session.role,
        experience: session.experience_level,
        date: session.created_at,
        questions: session.turns,
        answers: session.responses,
        evaluations: session.evaluations,
        score,
        overall_feedback: session.overall_feedback,
    }))
}
