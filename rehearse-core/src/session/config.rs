//! Interview behavior settings

use serde::{Deserialize, Serialize};

/// Settings for the session state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    /// Complete a session as soon as its last answer is scored
    #[serde(default = "default_auto_complete")]
    pub auto_complete: bool,

    /// Largest `num_questions` accepted when starting a session
    #[serde(default = "default_max_question_count")]
    pub max_question_count: u32,
}

fn default_auto_complete() -> bool {
    true
}

fn default_max_question_count() -> u32 {
    50
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            auto_complete: default_auto_complete(),
            max_question_count: default_max_question_count(),
        }
    }
}
