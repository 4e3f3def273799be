//! Shared application state for the rehearse server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rehearse_core::{
    Aggregator, DocumentStore, IdentityVerifier, InterviewSettings, ModelClient, ProfileService,
    SessionManager,
};

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Interview session state machine
    pub sessions: Arc<SessionManager>,
    /// Dashboard statistics
    pub aggregator: Aggregator,
    /// User profiles
    pub profiles: ProfileService,
    /// Resolves bearer tokens to identities
    pub verifier: Arc<dyn IdentityVerifier>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the core services over one store and one model client
    pub fn new(
        store: Arc<dyn DocumentStore>,
        client: ModelClient,
        verifier: Arc<dyn IdentityVerifier>,
        settings: InterviewSettings,
    ) -> Self {
        let sessions = SessionManager::new(store.clone(), client).with_settings(settings);
        Self {
            sessions: Arc::new(sessions),
            aggregator: Aggregator::new(store.clone()),
            profiles: ProfileService::new(store),
            verifier,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
