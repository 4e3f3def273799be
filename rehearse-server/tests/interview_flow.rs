//! Interview routes end to end through the router

mod common;

use axum::http::StatusCode;
use rehearse_server::http::{
    AnswerResponse, MessageResponse, OverallFeedbackResponse, SessionDetail, SessionMetadata,
    StartInterviewResponse, VerifyTokenResponse,
};
use serde_json::{Value, json};

use common::{create_harness, verdict};

async fn start(h: &common::Harness, uid: &str, n: u32) -> StartInterviewResponse {
    h.server
        .post("/interview/start")
        .authorization_bearer(uid)
        .json(&json!({ "role": "Backend Engineer", "experience": "mid", "num_questions": n }))
        .await
        .json()
}

#[tokio::test]
async fn welcome_is_public() {
    let h = create_harness();
    let response = h.server.get("/").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Welcome to the AI Interview Coach Backend!"
    );
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let h = create_harness();
    let response = h
        .server
        .post("/interview/start")
        .json(&json!({ "role": "r", "experience": "e", "num_questions": 1 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn verify_token_creates_profile() {
    let h = create_harness();
    let response = h
        .server
        .post("/auth/verify-token")
        .json(&json!({ "idToken": "alice" }))
        .await;
    response.assert_status_ok();
    let body: VerifyTokenResponse = response.json();
    assert_eq!(body.uid, "alice");
    assert_eq!(body.email.as_deref(), Some("alice@localhost"));

    let profile = h
        .server
        .get("/user/profile")
        .authorization_bearer("alice")
        .await
        .json::<Value>();
    assert_eq!(profile["uid"], "alice");
}

#[tokio::test]
async fn full_interview_over_http() {
    let h = create_harness();
    h.provider.reply("What is a mutex?");
    let started = start(&h, "alice", 2).await;
    assert_eq!(started.first_question, "What is a mutex?");

    h.provider.reply(verdict(7)).reply("What is a semaphore?");
    let first: AnswerResponse = h
        .server
        .post("/interview/answer")
        .authorization_bearer("alice")
        .json(&json!({
            "interview_id": started.interview_id,
            "question_text": "What is a mutex?",
            "answer_text": "A lock giving one task exclusive access"
        }))
        .await
        .json();
    assert_eq!(first.next_question.as_deref(), Some("What is a semaphore?"));
    assert_eq!(first.evaluation_feedback.score, 7);
    assert!(!first.completed);

    h.provider.reply(verdict(9));
    let last: AnswerResponse = h
        .server
        .post("/interview/answer")
        .authorization_bearer("alice")
        .json(&json!({
            "interview_id": started.interview_id,
            "answer_text": "A counter limiting concurrent holders"
        }))
        .await
        .json();
    assert!(last.next_question.is_none());
    assert!(last.completed);
    assert_eq!(last.message, "Interview completed.");

    h.provider.reply("Good grasp of synchronization.");
    let report: OverallFeedbackResponse = h
        .server
        .post("/interview/overall-feedback")
        .authorization_bearer("alice")
        .json(&json!({ "interview_id": started.interview_id }))
        .await
        .json();
    assert_eq!(report.final_score, 8.0);
    assert_eq!(report.per_question_scores, vec![7, 9]);
    assert_eq!(report.questions.len(), 2);

    let detail: SessionDetail = h
        .server
        .get(&format!("/recent-interviews/{}", started.interview_id))
        .authorization_bearer("alice")
        .await
        .json();
    assert_eq!(detail.score, Some(8.0));
    assert_eq!(
        detail.overall_feedback.as_deref(),
        Some("Good grasp of synchronization.")
    );

    let meta: SessionMetadata = h
        .server
        .get(&format!("/user/interview/{}", started.interview_id))
        .authorization_bearer("alice")
        .await
        .json();
    assert!(!meta.is_active);
    assert_eq!(meta.num_questions, 2);
    assert!(meta.ended_at.is_some());
}

#[tokio::test]
async fn invalid_question_count_is_bad_request() {
    let h = create_harness();
    h.server
        .post("/interview/start")
        .authorization_bearer("alice")
        .json(&json!({ "role": "r", "experience": "e", "num_questions": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_users_session_is_forbidden() {
    let h = create_harness();
    h.provider.reply("Q1");
    let started = start(&h, "alice", 2).await;

    h.server
        .post("/interview/answer")
        .authorization_bearer("mallory")
        .json(&json!({
            "interview_id": started.interview_id,
            "answer_text": "not mine"
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    h.server
        .get(&format!("/user/interview/{}", started.interview_id))
        .authorization_bearer("mallory")
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let h = create_harness();
    h.server
        .post("/interview/end")
        .authorization_bearer("alice")
        .json(&json!({ "interview_id": "nope" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn answer_after_end_is_forbidden() {
    let h = create_harness();
    h.provider.reply("Q1");
    let started = start(&h, "alice", 3).await;

    let ended: MessageResponse = h
        .server
        .post("/interview/end")
        .authorization_bearer("alice")
        .json(&json!({ "interview_id": started.interview_id }))
        .await
        .json();
    assert_eq!(ended.message, "Interview marked as completed and inactive.");

    h.server
        .post("/interview/answer")
        .authorization_bearer("alice")
        .json(&json!({
            "interview_id": started.interview_id,
            "answer_text": "too late"
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
