//! Server error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rehearse_core::{AuthError, SessionError, StoreError};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid server configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error returned by a route handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    /// Logged in full, reported to the client as an opaque 500
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                json!({ "error": "internal error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => ApiError::NotFound(format!("Interview not found: {id}")),
            e @ SessionError::Unauthorized { .. } => ApiError::Forbidden(e.to_string()),
            SessionError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            SessionError::Store(e) => ApiError::from(e),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => ApiError::NotFound(format!("Not found: {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Misconfigured(msg) => ApiError::Internal(msg),
            other => ApiError::Unauthenticated(format!("Invalid or expired token: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehearse_core::UnauthorizedReason;

    #[test]
    fn session_errors_map_to_statuses() {
        let cases = [
            (SessionError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                SessionError::Unauthorized {
                    session_id: "x".into(),
                    reason: UnauthorizedReason::Inactive,
                },
                StatusCode::FORBIDDEN,
            ),
            (
                SessionError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::Store(StoreError::Backend("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn auth_errors_are_unauthenticated() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Misconfigured("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
