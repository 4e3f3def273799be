//! Token verification and profile endpoints

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use rehearse_core::{Identity, UserProfile};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub uid: String,
    pub email: Option<String>,
    pub message: String,
}

/// POST /auth/verify-token
///
/// Verifies the token carried in the body and creates the caller's profile
/// on first login.
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let identity = state.verifier.verify(&body.id_token).await?;
    state.profiles.ensure(&identity).await?;
    tracing::debug!(uid = %identity.uid, "token verified");

    Ok(Json(VerifyTokenResponse {
        uid: identity.uid,
        email: identity.email,
        message: "Token verified successfully".to_string(),
    }))
}

/// GET /user/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.profiles.ensure(&identity).await?))
}
