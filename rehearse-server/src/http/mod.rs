//! HTTP server module

mod api;
mod auth;
mod dashboard;
mod interview;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{AppState, ServerError, require_identity};

pub use api::{HealthResponse, WELCOME_MESSAGE, WelcomeResponse};
pub use auth::{VerifyTokenRequest, VerifyTokenResponse};
pub use dashboard::{AllInterviewsResponse, DashboardResponse};
pub use interview::{
    AnswerRequest, AnswerResponse, InterviewRef, MessageResponse, OverallFeedbackResponse,
    SessionDetail, SessionMetadata, StartInterviewRequest, StartInterviewResponse,
};

/// Create the HTTP router with all routes configured
///
/// Everything except the welcome, health and token verification routes
/// requires a bearer token.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/user/profile", get(auth::profile))
        .route("/interview/start", post(interview::start))
        .route("/interview/answer", post(interview::answer))
        .route("/interview/end", post(interview::end))
        .route("/interview/overall-feedback", post(interview::overall_feedback))
        .route("/user/interview/:id", get(interview::metadata))
        .route("/recent-interviews/:id", get(interview::detail))
        .route("/user/dashboard/:uid", get(dashboard::dashboard))
        .route("/user/all-interviews/:uid", get(dashboard::all_interviews))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_identity,
        ));

    Router::new()
        .route("/", get(api::root))
        .route("/api/health", get(api::health))
        .route("/auth/verify-token", post(auth::verify_token))
        .merge(protected)
        .with_state(state)
}

/// CORS policy for the configured origins; permissive when none are listed
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| ServerError::Config(format!("invalid CORS origin {o:?}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any))
}
