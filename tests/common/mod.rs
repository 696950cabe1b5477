//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use speakspace::config::Settings;
use speakspace::shared::clock::ManualClock;
use speakspace::startup::{build_router, AppState};

/// Test application over fresh in-memory state and a manual clock
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::default());
        let state = AppState::new(Settings::default(), clock.clone()).expect("valid settings");
        Self {
            router: build_router(state.clone()),
            state,
            clock,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// GET, optionally as a user
    pub async fn get(&self, uri: &str, user: Option<Uuid>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(id) = user {
            builder = builder.header("X-User-Id", id.to_string());
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a JSON body, optionally as a user
    pub async fn post(&self, uri: &str, body: Value, user: Option<Uuid>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(id) = user {
            builder = builder.header("X-User-Id", id.to_string());
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// DELETE, optionally as a user
    pub async fn delete(&self, uri: &str, user: Option<Uuid>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(id) = user {
            builder = builder.header("X-User-Id", id.to_string());
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Raw GET returning the body as text
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Register a user and return its id
    pub async fn register(&self, name: &str, role: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                    "password": "practice-makes-perfect",
                    "role": role,
                }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    /// Create a session as `moderator` and return its id
    pub async fn create_session(&self, moderator: Uuid, minutes: u32) -> Uuid {
        let (status, body) = self
            .post(
                "/api/v1/sessions",
                json!({
                    "title": "Should remote work be the default?",
                    "type": "group_discussion",
                    "duration_minutes": minutes,
                }),
                Some(moderator),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("response carries an id")
}
