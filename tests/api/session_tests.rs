//! Session lifecycle API tests

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_only_moderators_create_sessions() {
    let app = TestApp::new();
    let participant = app.register("Jane Participant", "participant").await;

    let (status, _) = app
        .post(
            "/api/v1/sessions",
            json!({"title": "Mock interview", "type": "interview", "duration_minutes": 30}),
            Some(participant),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/v1/sessions",
            json!({"title": "Mock interview", "duration_minutes": 30}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_session_validates_input() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;

    let (status, body) = app
        .post(
            "/api/v1/sessions",
            json!({"title": "AI", "duration_minutes": 0}),
            Some(moderator),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_join_leave_and_listing() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let jane = app.register("Jane Participant", "participant").await;
    let sarah = app.register("Sarah Evaluator", "evaluator").await;
    let session = app.create_session(moderator, 20).await;
    let base = format!("/api/v1/sessions/{}", session);

    let (status, body) = app.post(&format!("{base}/join"), json!({}), Some(jane)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participant_count"], 1);

    let (status, body) = app.post(&format!("{base}/join"), json!({}), Some(sarah)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participant_count"], 1);
    assert_eq!(body["members"].as_array().unwrap().len(), 2);

    let (status, _) = app.post(&format!("{base}/join"), json!({}), Some(jane)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(&format!("{base}/join"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&format!("{base}/leave"), json!({}), Some(sarah)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .get("/api/v1/sessions?status=upcoming", Some(jane))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["type"], "group_discussion");

    let (status, body) = app.get("/api/v1/sessions?status=active", Some(jane)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.get("/api/v1/sessions?status=archived", Some(jane)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_and_malformed_session_ids() {
    let app = TestApp::new();
    let jane = app.register("Jane Participant", "participant").await;

    let (status, _) = app
        .get(&format!("/api/v1/sessions/{}", uuid::Uuid::new_v4()), Some(jane))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/v1/sessions/abc", Some(jane)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid session ID");
}

#[tokio::test]
async fn test_start_pause_resume_end() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let jane = app.register("Jane Participant", "participant").await;
    let session = app.create_session(moderator, 20).await;
    let base = format!("/api/v1/sessions/{}", session);

    let (_, timer) = app.get(&format!("{base}/timer"), Some(jane)).await;
    assert_eq!(timer["state"], "idle");
    assert_eq!(timer["remaining_seconds"], 1200);
    assert_eq!(timer["display"], "20:00");

    let (status, _) = app.post(&format!("{base}/start"), json!({}), Some(jane)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, _) = app
        .post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.clock.advance_secs(65);
    let (status, timer) = app
        .post(&format!("{base}/pause"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["state"], "paused");
    assert_eq!(timer["display"], "18:55");

    app.clock.advance_secs(300);
    let (_, timer) = app.get(&format!("{base}/timer"), Some(jane)).await;
    assert_eq!(timer["remaining_seconds"], 1135);

    let (status, timer) = app
        .post(&format!("{base}/resume"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["state"], "running");

    let (status, body) = app
        .post(&format!("{base}/end"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert!(body["ended_at"].is_string());

    let (status, _) = app
        .post(&format!("{base}/end"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_moderator_manages_roster_and_deletes() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let jane = app.register("Jane Participant", "participant").await;
    let session = app.create_session(moderator, 20).await;
    let base = format!("/api/v1/sessions/{}", session);
    app.post(&format!("{base}/join"), json!({}), Some(jane)).await;

    let (status, _) = app
        .delete(&format!("{base}/members/{}", jane), Some(jane))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .delete(&format!("{base}/members/{}", jane), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participant_count"], 0);

    let (status, _) = app
        .delete(&format!("{base}/members/not-a-uuid"), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&base, Some(jane)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&base, Some(moderator)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&base, Some(moderator)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_live_session_cannot_be_deleted() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let jane = app.register("Jane Participant", "participant").await;
    let session = app.create_session(moderator, 20).await;
    let base = format!("/api/v1/sessions/{}", session);
    app.post(&format!("{base}/join"), json!({}), Some(jane)).await;
    app.post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;

    let (status, _) = app.delete(&base, Some(moderator)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .delete(&format!("{base}/members/{}", jane), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test(start_paused = true)]
async fn test_session_completes_when_countdown_expires() {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let session = app.create_session(moderator, 1).await;
    let base = format!("/api/v1/sessions/{}", session);

    app.post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;
    assert_eq!(app.state.scheduler.live_count(), 1);

    app.clock.advance_secs(61);
    tokio::time::sleep(app.state.settings.timer.tick_interval() * 3).await;

    let (_, body) = app.get(&base, Some(moderator)).await;
    assert_eq!(body["status"], "completed");

    let (_, timer) = app.get(&format!("{base}/timer"), Some(moderator)).await;
    assert_eq!(timer["state"], "expired");
    assert_eq!(timer["remaining_seconds"], 0);
    assert_eq!(timer["display"], "00:00");
    assert_eq!(app.state.scheduler.live_count(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let (status, _) = app
        .post(&format!("{base}/end"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
