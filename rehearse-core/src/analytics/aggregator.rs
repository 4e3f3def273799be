//! Read-only statistics over stored sessions

use std::sync::Arc;

use tracing::debug;

use super::{Dashboard, SessionSummary};
use crate::interview::text::round1;
use crate::session::{Session, SessionStatus, Verdict};
use crate::store::{DocumentStore, SessionRepository, StoreError};

/// Completed sessions shown in [`Dashboard::recent_sessions`]
pub const RECENT_SESSIONS: usize = 3;

/// Computes dashboard statistics for one owner
#[derive(Clone)]
pub struct Aggregator {
    repo: SessionRepository,
}

impl Aggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: SessionRepository::new(store),
        }
    }

    pub async fn dashboard(&self, owner_uid: &str) -> Result<Dashboard, StoreError> {
        let sessions = self.repo.list_for_owner(owner_uid).await?;
        debug!(owner = owner_uid, sessions = sessions.len(), "building dashboard");
        Ok(summarize(&sessions))
    }

    /// Summaries of every completed session, newest first
    pub async fn all_sessions(&self, owner_uid: &str) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.repo.list_for_owner(owner_uid).await?;
        Ok(completed_newest_first(&sessions)
            .into_iter()
            .map(session_summary)
            .collect())
    }
}

/// Dashboard statistics for a set of sessions
///
/// Active sessions are ignored entirely.
pub fn summarize(sessions: &[Session]) -> Dashboard {
    let completed = completed_newest_first(sessions);
    if completed.is_empty() {
        return Dashboard::empty();
    }

    let mut total_score = 0u32;
    let mut total_max = 0u32;
    let mut best = 0.0f64;
    let summaries: Vec<SessionSummary> = completed.into_iter().map(session_summary).collect();
    for summary in &summaries {
        total_score += summary.total_score;
        total_max += summary.max_score;
        best = best.max(summary.percentage);
    }

    Dashboard {
        total_sessions: summaries.len(),
        average_percentage: percentage(total_score, total_max),
        best_percentage: best,
        recent_sessions: summaries.into_iter().take(RECENT_SESSIONS).collect(),
    }
}

pub fn session_summary(session: &Session) -> SessionSummary {
    let answered = session.evaluations.len();
    let total_score = session.total_score();
    let max_score = answered as u32 * u32::from(Verdict::MAX_SCORE);
    let average_score = if answered == 0 {
        0.0
    } else {
        round1(f64::from(total_score) / answered as f64)
    };

    SessionSummary {
        id: session.id.clone(),
        role: session.role.clone(),
        experience: session.experience_level.clone(),
        created_at: session.created_at,
        ended_at: session.ended_at,
        answered,
        asked: session.turns.len(),
        total_score,
        max_score,
        percentage: percentage(total_score, max_score),
        average_score,
    }
}

fn completed_newest_first(sessions: &[Session]) -> Vec<&Session> {
    let mut completed: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .collect();
    completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    completed
}

fn percentage(score: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    round1(f64::from(score) / f64::from(max) * 100.0)
}
