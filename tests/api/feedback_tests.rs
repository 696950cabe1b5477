//! Feedback API tests

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestApp;

fn feedback_body(participant: uuid::Uuid) -> Value {
    json!({
        "participant_id": participant,
        "ratings": {"communication": 8, "confidence": 7, "logic": 8, "engagement": 8},
        "comments": "Clear structure and good use of examples",
        "strengths": "Active listening",
        "improvements": "Let others finish"
    })
}

#[tokio::test]
async fn test_evaluator_feedback_flow() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let jane = app.register("Jane Participant", "participant").await;
    let sarah = app.register("Sarah Evaluator", "evaluator").await;
    let session = app.create_session(moderator, 15).await;
    let base = format!("/api/v1/sessions/{}", session);

    app.post(&format!("{base}/join"), json!({}), Some(jane)).await;
    app.post(&format!("{base}/join"), json!({}), Some(sarah)).await;

    let (status, _) = app
        .post(&format!("{base}/feedback"), feedback_body(jane), Some(sarah))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;

    let (status, body) = app
        .post(&format!("{base}/feedback"), feedback_body(jane), Some(sarah))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["overall"], 7.8);
    assert_eq!(body["level"], "very_good");
    assert_eq!(body["evaluator_id"], sarah.to_string());

    let (status, _) = app
        .post(&format!("{base}/feedback"), feedback_body(jane), Some(sarah))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(&format!("{base}/feedback"), feedback_body(jane), Some(jane))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&format!("{base}/feedback"), feedback_body(sarah), Some(sarah))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = app.get(&format!("{base}/feedback"), Some(moderator)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, received) = app.get("/api/v1/feedback/received", Some(jane)).await;
    assert_eq!(received.as_array().unwrap().len(), 1);
    assert_eq!(received[0]["comments"], "Clear structure and good use of examples");

    let (status, summary) = app.get("/api/v1/feedback/received/summary", Some(jane)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["feedback_count"], 1);
    assert_eq!(summary["session_count"], 1);
    assert_eq!(summary["averages"]["logic"], 8.0);
    assert_eq!(summary["overall"], 7.8);
    assert_eq!(summary["level"], "very_good");

    let (_, given) = app.get("/api/v1/feedback/given", Some(sarah)).await;
    assert_eq!(given.as_array().unwrap().len(), 1);

    let outsider = app.register("Out Sider", "participant").await;
    let (status, _) = app.get(&format!("{base}/feedback"), Some(outsider)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feedback_ratings_out_of_range() {
    let app = TestApp::new();
    let sarah = app.register("Sarah Evaluator", "evaluator").await;
    let mut body = feedback_body(uuid::Uuid::new_v4());
    body["ratings"]["logic"] = json!(11);

    let (status, body) = app
        .post(
            &format!("/api/v1/sessions/{}/feedback", uuid::Uuid::new_v4()),
            body,
            Some(sarah),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}
