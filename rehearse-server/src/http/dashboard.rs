//! Dashboard endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rehearse_core::profile::DEFAULT_DISPLAY_NAME;
use rehearse_core::{Identity, SessionSummary};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub name: String,
    pub total_sessions: usize,
    pub average_percentage: f64,
    pub best_percentage: f64,
    pub recent_sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllInterviewsResponse {
    pub all_interviews: Vec<SessionSummary>,
}

fn require_self(identity: &Identity, uid: &str) -> Result<(), ApiError> {
    if identity.uid != uid {
        return Err(ApiError::Forbidden(
            "Not authorized to view another user's dashboard.".to_string(),
        ));
    }
    Ok(())
}

/// GET /user/dashboard/{uid}
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(uid): Path<String>,
) -> Result<Json<DashboardResponse>, ApiError> {
    require_self(&identity, &uid)?;

    let name = state
        .profiles
        .get(&uid)
        .await?
        .map(|p| p.name_or_default().to_string())
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
    let dashboard = state.aggregator.dashboard(&uid).await?;

    Ok(Json(DashboardResponse {
        name,
        total_sessions: dashboard.total_sessions,
        average_percentage: dashboard.average_percentage,
        best_percentage: dashboard.best_percentage,
        recent_sessions: dashboard.recent_sessions,
    }))
}

/// GET /user/all-interviews/{uid}
pub async fn all_interviews(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(uid): Path<String>,
) -> Result<Json<AllInterviewsResponse>, ApiError> {
    require_self(&identity, &uid)?;
    Ok(Json(AllInterviewsResponse {
        all_interviews: state.aggregator.all_sessions(&uid).await?,
    }))
}
