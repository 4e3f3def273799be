//! Dashboard statistics computed from sessions run through SessionManager

use std::sync::Arc;

use rehearse_core::analytics::Aggregator;
use rehearse_core::auth::Identity;
use rehearse_core::interview::ModelClient;
use rehearse_core::session::{SessionManager, StartRequest};
use rehearse_core::store::{DocumentStore, MemoryDocumentStore};
use rehearse_models::ScriptedProvider;

fn verdict(score: u8) -> String {
    format!(
        r#"{{"score": {score}, "reason": "ok", "confidence": "Medium", "red_flag": ""}}"#
    )
}

async fn run_session(
    manager: &SessionManager,
    provider: &ScriptedProvider,
    uid: &str,
    scores: &[u8],
) -> String {
    provider.reply("Q0");
    let started = manager
        .start(
            &Identity::new(uid),
            StartRequest {
                role: "QA".into(),
                experience: "senior".into(),
                num_questions: scores.len() as u32,
            },
        )
        .await
        .unwrap();

    for (i, score) in scores.iter().enumerate() {
        provider.reply(verdict(*score));
        if i + 1 < scores.len() {
            provider.reply(format!("Q{}", i + 1));
        }
        manager
            .submit_answer(&started.session_id, uid, "", &format!("answer number {i} with detail"))
            .await
            .unwrap();
    }
    started.session_id
}

#[tokio::test]
async fn weighted_average_across_sessions() {
    let provider = Arc::new(ScriptedProvider::new());
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let manager = SessionManager::new(store.clone(), ModelClient::new(provider.clone(), "m"));
    let aggregator = Aggregator::new(store);

    run_session(&manager, &provider, "alice", &[10]).await;
    run_session(&manager, &provider, "alice", &[5; 10]).await;

    let dashboard = aggregator.dashboard("alice").await.unwrap();
    assert_eq!(dashboard.total_sessions, 2);
    assert_eq!(dashboard.average_percentage, 54.5);
    assert_eq!(dashboard.best_percentage, 100.0);
    assert_eq!(dashboard.recent_sessions.len(), 2);
}

#[tokio::test]
async fn active_and_foreign_sessions_are_excluded() {
    let provider = Arc::new(ScriptedProvider::new());
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let manager = SessionManager::new(store.clone(), ModelClient::new(provider.clone(), "m"));
    let aggregator = Aggregator::new(store);

    let done = run_session(&manager, &provider, "alice", &[7, 9]).await;
    run_session(&manager, &provider, "bob", &[1]).await;

    provider.reply("Q0");
    manager
        .start(
            &Identity::new("alice"),
            StartRequest {
                role: "QA".into(),
                experience: "senior".into(),
                num_questions: 4,
            },
        )
        .await
        .unwrap();

    let all = aggregator.all_sessions("alice").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, done);
    assert_eq!(all[0].percentage, 80.0);

    let dashboard = aggregator.dashboard("alice").await.unwrap();
    assert_eq!(dashboard.total_sessions, 1);
    assert_eq!(dashboard.average_percentage, 80.0);
}
