//! Authentication API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_register_with_valid_data() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            json!({
                "name": "Sarah Evaluator",
                "email": "Sarah@Example.com",
                "password": "ValidPassword123!",
                "role": "evaluator"
            }),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "sarah@example.com");
    assert_eq!(body["role"], "evaluator");
    assert_eq!(
        body["avatar_url"],
        "https://ui-avatars.com/api/?name=Sarah+Evaluator"
    );
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            json!({"name": "Test", "email": "not-an-email", "password": "ValidPassword123!"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("Jane Participant", "participant").await;

    let (status, _) = app
        .post(
            "/api/v1/auth/register",
            json!({
                "name": "Jane Again",
                "email": "JANE.PARTICIPANT@example.com",
                "password": "AnotherPassword1"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_checks_password_and_role() {
    let app = TestApp::new();
    let id = app.register("John Moderator", "moderator").await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            json!({
                "email": "john.moderator@example.com",
                "password": "practice-makes-perfect",
                "role": "moderator"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            json!({
                "email": "john.moderator@example.com",
                "password": "practice-makes-perfect",
                "role": "participant"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            json!({
                "email": "john.moderator@example.com",
                "password": "wrong-password",
                "role": "moderator"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user_requires_identity() {
    let app = TestApp::new();
    let id = app.register("Jane Participant", "participant").await;

    let (status, body) = app.get("/api/v1/users/@me", Some(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Participant");
    assert_eq!(body["email"], "jane.participant@example.com");

    let (status, _) = app.get("/api/v1/users/@me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/users/@me", Some(uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_users_email_hidden() {
    let app = TestApp::new();
    let me = app.register("Jane Participant", "participant").await;
    let other = app.register("Mike Chen", "participant").await;

    let (status, body) = app.get(&format!("/api/v1/users/{}", other), Some(me)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mike Chen");
    assert!(body.get("email").is_none());

    let (status, _) = app.get("/api/v1/users/not-a-uuid", Some(me)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
