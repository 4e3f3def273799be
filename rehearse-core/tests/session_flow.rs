//! End-to-end session flows against a file-backed store

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rehearse_core::auth::Identity;
use rehearse_core::error::{SessionError, UnauthorizedReason};
use rehearse_core::interview::{ModelClient, NO_ANSWERS_FEEDBACK};
use rehearse_core::session::{SessionManager, SessionStatus, StartRequest};
use rehearse_core::store::{DocumentStore, JsonFileDocumentStore, SessionRepository};
use rehearse_models::{
    ChatRequest, ChatResponse, Content, ModelProvider, ScriptedProvider, StopReason, Usage,
};
use tempfile::TempDir;

fn verdict(score: u8) -> String {
    format!(
        r#"{{"score": {score}, "reason": "Scored {score}.", "confidence": "Medium", "red_flag": ""}}"#
    )
}

fn request(n: u32) -> StartRequest {
    StartRequest {
        role: "Data Engineer".into(),
        experience: "junior".into(),
        num_questions: n,
    }
}

async fn setup(dir: &TempDir) -> (SessionManager, Arc<ScriptedProvider>, SessionRepository) {
    let store: Arc<dyn DocumentStore> =
        Arc::new(JsonFileDocumentStore::open(dir.path()).await.unwrap());
    let provider = Arc::new(ScriptedProvider::new());
    let client = ModelClient::new(provider.clone(), "test-model");
    (
        SessionManager::new(store.clone(), client),
        provider,
        SessionRepository::new(store),
    )
}

#[tokio::test]
async fn full_interview_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let session_id = {
        let (manager, provider, repo) = setup(&dir).await;
        provider.reply("Q1");
        let started = manager.start(&Identity::new("dana"), request(2)).await.unwrap();

        provider.reply(verdict(8)).reply("Q2");
        let first = manager
            .submit_answer(
                &started.session_id,
                "dana",
                "Q1",
                "Partitioning by date keeps scans small",
            )
            .await
            .unwrap();
        assert_eq!(first.next_question.as_deref(), Some("Q2"));

        provider.reply(verdict(6));
        let last = manager
            .submit_answer(&started.session_id, "dana", "Q2", "Use idempotent writes for retries")
            .await
            .unwrap();
        assert!(last.completed);
        assert!(last.next_question.is_none());

        let session = repo.load(&started.session_id).await.unwrap();
        session.check_invariants().unwrap();
        started.session_id
    };

    let (manager, provider, _repo) = setup(&dir).await;
    let session = manager.get(&session_id, "dana").await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.turns.len(), 2);
    assert_eq!(session.evaluations.iter().map(|v| v.score).collect::<Vec<_>>(), vec![8, 6]);

    provider.reply("Solid fundamentals.");
    let report = manager.finalize_with_feedback(&session_id, "dana").await.unwrap();
    assert_eq!(report.avg_score, 7.0);
    assert_eq!(report.per_question_scores, vec![8, 6]);
}

#[tokio::test]
async fn starting_again_completes_the_previous_session() {
    let dir = TempDir::new().unwrap();
    let (manager, provider, repo) = setup(&dir).await;
    provider.reply("Q1").reply("Q1 again");

    let first = manager.start(&Identity::new("dana"), request(3)).await.unwrap();
    let second = manager.start(&Identity::new("dana"), request(3)).await.unwrap();

    let old = repo.load(&first.session_id).await.unwrap();
    assert_eq!(old.status, SessionStatus::Completed);
    assert!(old.ended_at.is_some());

    let active = repo.active_for_owner("dana").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.session_id);
}

#[tokio::test]
async fn other_users_sessions_are_untouched_by_start() {
    let dir = TempDir::new().unwrap();
    let (manager, provider, repo) = setup(&dir).await;
    provider.reply("Q1").reply("Q1");

    let dana = manager.start(&Identity::new("dana"), request(3)).await.unwrap();
    manager.start(&Identity::new("eli"), request(3)).await.unwrap();

    assert!(repo.load(&dana.session_id).await.unwrap().is_active());
}

#[tokio::test]
async fn non_owner_operations_do_not_mutate() {
    let dir = TempDir::new().unwrap();
    let (manager, provider, repo) = setup(&dir).await;
    provider.reply("Q1");
    let started = manager.start(&Identity::new("dana"), request(3)).await.unwrap();
    let before = repo.load(&started.session_id).await.unwrap();

    let err = manager
        .submit_answer(&started.session_id, "mallory", "Q1", "hijacked answer")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Unauthorized { reason: UnauthorizedReason::NotOwner, .. }
    ));

    let err = manager.end(&started.session_id, "mallory").await.unwrap_err();
    assert!(matches!(err, SessionError::Unauthorized { .. }));

    let err = manager
        .finalize_with_feedback(&started.session_id, "mallory")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Unauthorized { reason: UnauthorizedReason::NotOwner, .. }
    ));

    let after = repo.load(&started.session_id).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn finalize_without_answers_skips_the_model() {
    let dir = TempDir::new().unwrap();
    let (manager, provider, _repo) = setup(&dir).await;
    provider.reply("Q1");
    let started = manager.start(&Identity::new("dana"), request(3)).await.unwrap();

    let report = manager
        .finalize_with_feedback(&started.session_id, "dana")
        .await
        .unwrap();
    assert_eq!(report.avg_score, 0.0);
    assert!(report.transcript.is_empty());
    assert_eq!(report.overall_feedback, NO_ANSWERS_FEEDBACK);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn evaluator_failure_still_records_a_zero() {
    let dir = TempDir::new().unwrap();
    let (manager, provider, repo) = setup(&dir).await;
    provider.reply("Q1");
    let started = manager.start(&Identity::new("dana"), request(2)).await.unwrap();

    provider.reply("this is not json").reply("Q2");
    let outcome = manager
        .submit_answer(&started.session_id, "dana", "Q1", "An answer that is long enough")
        .await
        .unwrap();
    assert_eq!(outcome.verdict.score, 0);
    assert_eq!(outcome.next_question.as_deref(), Some("Q2"));

    let session = repo.load(&started.session_id).await.unwrap();
    session.check_invariants().unwrap();
    assert_eq!(session.evaluations.len(), 1);
}

/// Answers the first call, then hangs on every later one
struct StallsAfterFirstCall {
    calls: AtomicUsize,
}

#[async_trait]
impl ModelProvider for StallsAfterFirstCall {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn chat(&self, _request: ChatRequest) -> rehearse_models::Result<ChatResponse> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            std::future::pending::<()>().await;
        }
        Ok(ChatResponse {
            content: Content::text("Q1"),
            stop_reason: StopReason::EndTurn,
            usage: Usage::new(0, 1),
        })
    }
}

#[tokio::test]
async fn stalled_model_degrades_and_releases_the_session() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn DocumentStore> =
        Arc::new(JsonFileDocumentStore::open(dir.path()).await.unwrap());
    let provider = Arc::new(StallsAfterFirstCall { calls: AtomicUsize::new(0) });
    let client = ModelClient::new(provider, "test-model").with_timeout(Duration::from_millis(100));
    let manager = SessionManager::new(store.clone(), client);
    let repo = SessionRepository::new(store);

    let started = manager.start(&Identity::new("dana"), request(3)).await.unwrap();
    assert_eq!(started.first_question, "Q1");

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        manager.submit_answer(&started.session_id, "dana", "Q1", "A long enough answer to score"),
    )
    .await
    .expect("submit_answer should not hang on a stalled model")
    .unwrap();
    assert_eq!(outcome.verdict.score, 0);
    assert!(outcome.next_question.is_some());

    tokio::time::timeout(Duration::from_secs(5), manager.end(&started.session_id, "dana"))
        .await
        .expect("end should not wait behind a stalled call")
        .unwrap();

    let session = repo.load(&started.session_id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.evaluations.len(), 1);
}
