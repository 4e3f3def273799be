//! Shared test utilities for rehearse-server integration tests

use std::net::SocketAddr;
use std::sync::Arc;

use axum_test::TestServer;
use rehearse_core::{
    DevVerifier, DocumentStore, InterviewSettings, MemoryDocumentStore, ModelClient,
};
use rehearse_models::ScriptedProvider;
use rehearse_server::{AppState, RehearseServer, ServerConfig, create_router};
use tokio::net::TcpListener;

/// A verdict reply in the shape the evaluator expects
#[allow(dead_code)]
pub fn verdict(score: u8) -> String {
    format!(
        r#"{{"score": {score}, "reason": "Scored {score}.", "confidence": "Medium", "red_flag": ""}}"#
    )
}

/// Test harness: in-memory store, scripted model, dev identities
pub struct Harness {
    pub server: TestServer,
    pub provider: Arc<ScriptedProvider>,
    #[allow(dead_code)]
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
pub fn create_state(provider: Arc<ScriptedProvider>) -> Arc<AppState> {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let client = ModelClient::new(provider, "test-model");
    Arc::new(AppState::new(
        store,
        client,
        Arc::new(DevVerifier::new()),
        InterviewSettings::default(),
    ))
}

/// Creates an in-process test server
#[allow(dead_code)]
pub fn create_harness() -> Harness {
    let provider = Arc::new(ScriptedProvider::new());
    let state = create_state(provider.clone());
    let server = TestServer::new(create_router(Arc::clone(&state))).unwrap();
    Harness {
        server,
        provider,
        state,
    }
}

/// Spawns a real server on an ephemeral port, returns its address
#[allow(dead_code)]
pub async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let state = create_state(Arc::new(ScriptedProvider::new()));
    let server = RehearseServer::new(config, state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay to ensure server is accepting connections
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    addr
}
