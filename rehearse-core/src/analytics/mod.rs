//! Dashboard analytics over completed sessions

mod aggregator;
mod types;

pub use aggregator::{Aggregator, RECENT_SESSIONS, session_summary, summarize};
pub use types::{Dashboard, SessionSummary};
