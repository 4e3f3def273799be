//! Dashboard data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed session as shown on a dashboard card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub role: String,
    pub experience: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Questions answered (and scored)
    pub answered: usize,
    /// Questions asked
    pub asked: usize,
    pub total_score: u32,
    /// `answered * 10`
    pub max_score: u32,
    /// `total_score / max_score` as a percentage, one decimal; 0.0 with no answers
    pub percentage: f64,
    /// Mean score per answer, one decimal
    pub average_score: f64,
}

/// Aggregate statistics over a user's completed sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_sessions: usize,
    /// Weighted by answers: total points over total possible points
    pub average_percentage: f64,
    pub best_percentage: f64,
    pub recent_sessions: Vec<SessionSummary>,
}

impl Dashboard {
    pub fn empty() -> Self {
        Self {
            total_sessions: 0,
            average_percentage: 0.0,
            best_percentage: 0.0,
            recent_sessions: Vec::new(),
        }
    }
}
