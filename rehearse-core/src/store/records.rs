//! Typed records at the store boundary
//!
//! Sessions live in the `interviews` collection as loosely typed field
//! maps. [`decode_session`] turns one into a [`Session`], and any missing
//! field, malformed value or broken index alignment becomes
//! `StoreError::DataCorruption` instead of a silent default.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{DocumentStore, Fields, SESSIONS, StoreError};
use crate::session::{Answer, Confidence, Question, Session, SessionStatus, Verdict};

/// Field names of a session document
pub mod field {
    pub const USER_UID: &str = "user_uid";
    pub const USER_EMAIL: &str = "user_email";
    pub const ROLE: &str = "role";
    pub const EXPERIENCE: &str = "experience";
    pub const NUM_QUESTIONS: &str = "num_questions";
    pub const QUESTIONS: &str = "questions";
    pub const ANSWERS: &str = "answers";
    pub const EVALUATION: &str = "evaluation";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const ENDED_AT: &str = "ended_at";
    pub const OVERALL_FEEDBACK: &str = "overall_feedback";
    pub const UPDATED_AT: &str = "updated_at";
}

#[derive(Debug, Serialize, Deserialize)]
struct QuestionRecord {
    text: String,
    timestamp: DateTime<Utc>,
    from_ai: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnswerRecord {
    text: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VerdictRecord {
    score: u8,
    reason: String,
    confidence: Confidence,
    #[serde(default)]
    red_flag: String,
}

/// Stored shape of a session
#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    user_uid: String,
    #[serde(default)]
    user_email: Option<String>,
    role: String,
    experience: String,
    num_questions: u32,
    questions: Vec<QuestionRecord>,
    answers: Vec<AnswerRecord>,
    evaluation: Vec<VerdictRecord>,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    overall_feedback: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&Session> for SessionDocument {
    fn from(s: &Session) -> Self {
        Self {
            user_uid: s.owner_uid.clone(),
            user_email: s.owner_email.clone(),
            role: s.role.clone(),
            experience: s.experience_level.clone(),
            num_questions: s.target_question_count,
            questions: s
                .turns
                .iter()
                .map(|q| QuestionRecord {
                    text: q.text.clone(),
                    timestamp: q.timestamp,
                    from_ai: q.from_model,
                })
                .collect(),
            answers: s
                .responses
                .iter()
                .map(|a| AnswerRecord {
                    text: a.text.clone(),
                    timestamp: a.timestamp,
                })
                .collect(),
            evaluation: s
                .evaluations
                .iter()
                .map(|v| VerdictRecord {
                    score: v.score,
                    reason: v.reason.clone(),
                    confidence: v.confidence,
                    red_flag: v.red_flag.clone(),
                })
                .collect(),
            status: s.status,
            created_at: s.created_at,
            ended_at: s.ended_at,
            overall_feedback: s.overall_feedback.clone(),
            updated_at: s.updated_at,
        }
    }
}

impl SessionDocument {
    fn into_session(self, id: String) -> Session {
        Session {
            id,
            owner_uid: self.user_uid,
            owner_email: self.user_email,
            role: self.role,
            experience_level: self.experience,
            target_question_count: self.num_questions,
            turns: self
                .questions
                .into_iter()
                .map(|q| Question {
                    text: q.text,
                    timestamp: q.timestamp,
                    from_model: q.from_ai,
                })
                .collect(),
            responses: self
                .answers
                .into_iter()
                .map(|a| Answer {
                    text: a.text,
                    timestamp: a.timestamp,
                })
                .collect(),
            evaluations: self
                .evaluation
                .into_iter()
                .map(|v| Verdict {
                    score: v.score,
                    reason: v.reason,
                    confidence: v.confidence,
                    red_flag: v.red_flag,
                })
                .collect(),
            status: self.status,
            created_at: self.created_at,
            ended_at: self.ended_at,
            overall_feedback: self.overall_feedback,
            updated_at: self.updated_at,
        }
    }
}

/// Encode a session as a full document body
pub fn encode_session(session: &Session) -> Result<Fields, StoreError> {
    match serde_json::to_value(SessionDocument::from(session))? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::Backend(
            "session did not encode to an object".to_string(),
        )),
    }
}

/// Decode and validate a stored session document
pub fn decode_session(id: &str, fields: Fields) -> Result<Session, StoreError> {
    let doc: SessionDocument = serde_json::from_value(Value::Object(fields))
        .map_err(|e| StoreError::corruption(SESSIONS, id, e.to_string()))?;
    let session = doc.into_session(id.to_string());
    session
        .check_invariants()
        .map_err(|reason| StoreError::corruption(SESSIONS, id, reason))?;
    Ok(session)
}

/// Keep only the named fields of an encoded document
fn select(mut fields: Fields, names: &[&str]) -> Fields {
    fields.retain(|k, _| names.contains(&k.as_str()));
    fields
}

/// Typed access to the `interviews` collection
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn DocumentStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Load a session, `StoreError::NotFound` if absent
    pub async fn load(&self, id: &str) -> Result<Session, StoreError> {
        let doc = self
            .store
            .get(SESSIONS, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: SESSIONS.to_string(),
                id: id.to_string(),
            })?;
        decode_session(&doc.id, doc.fields)
    }

    /// Store a new session and fill in its assigned id
    pub async fn insert(&self, session: &mut Session) -> Result<String, StoreError> {
        let fields = encode_session(session)?;
        let id = self.store.add(SESSIONS, fields).await?;
        session.id = id.clone();
        Ok(id)
    }

    /// Write back only the `changed` fields, stamping `updated_at`
    pub async fn save(&self, session: &mut Session, changed: &[&str]) -> Result<(), StoreError> {
        session.updated_at = Some(Utc::now());
        let mut names = changed.to_vec();
        names.push(field::UPDATED_AT);
        let fields = select(encode_session(session)?, &names);
        self.store.update(SESSIONS, &session.id, fields).await
    }

    /// Every session owned by `uid`, in store order
    pub async fn list_for_owner(&self, uid: &str) -> Result<Vec<Session>, StoreError> {
        let docs = self
            .store
            .query_eq(SESSIONS, field::USER_UID, &json!(uid))
            .await?;
        docs.into_iter()
            .map(|doc| decode_session(&doc.id, doc.fields))
            .collect()
    }

    /// Active sessions owned by `uid`
    pub async fn active_for_owner(&self, uid: &str) -> Result<Vec<Session>, StoreError> {
        Ok(self
            .list_for_owner(uid)
            .await?
            .into_iter()
            .filter(Session::is_active)
            .collect())
    }
}
