//! Bearer-token authentication middleware for axum

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use rehearse_core::AuthError;

use crate::AppState;
use crate::error::ApiError;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller and attach the [`rehearse_core::Identity`] to the request
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::debug!("No bearer token provided");
        return Err(AuthError::MissingToken.into());
    };

    let identity = match state.verifier.verify(token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            return Err(e.into());
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
