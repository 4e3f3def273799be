//! Interview sessions
//!
//! A [`Session`] holds three parallel lists: the questions asked, the
//! candidate's answers and one verdict per answer. [`SessionManager`] is the
//! only writer and keeps them aligned.

mod config;
mod locks;
mod manager;
mod types;

pub use config::InterviewSettings;
pub use locks::{KeyGuard, SessionLocks};
pub use manager::{
    AnswerOutcome, FinalReport, SessionManager, StartRequest, StartedSession, TranscriptLine,
};
pub use types::{Answer, Confidence, Exchange, Question, Session, SessionStatus, Verdict};
