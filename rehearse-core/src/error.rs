//! Error types for rehearse-core

use std::fmt;

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Top-level error type for rehearse-core
#[derive(Error, Debug)]
pub enum RehearseError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Why a caller may not act on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// The requester does not own the session
    NotOwner,
    /// The operation needs an active session
    Inactive,
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnauthorizedReason::NotOwner => write!(f, "requester does not own the session"),
            UnauthorizedReason::Inactive => write!(f, "session is not active"),
        }
    }
}

/// Errors from session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Not authorized for session {session_id}: {reason}")]
    Unauthorized {
        session_id: String,
        reason: UnauthorizedReason,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => SessionError::NotFound(id),
            other => SessionError::Store(other),
        }
    }
}

impl SessionError {
    pub(crate) fn not_owner(session_id: impl Into<String>) -> Self {
        SessionError::Unauthorized {
            session_id: session_id.into(),
            reason: UnauthorizedReason::NotOwner,
        }
    }

    pub(crate) fn inactive(session_id: impl Into<String>) -> Self {
        SessionError::Unauthorized {
            session_id: session_id.into(),
            reason: UnauthorizedReason::Inactive,
        }
    }
}
