//! Participation tracking API tests

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::TestApp;

struct Room {
    app: TestApp,
    moderator: Uuid,
    participants: Vec<Uuid>,
    base: String,
}

async fn live_room(names: &[&str], minutes: u32) -> Room {
    let app = TestApp::new();
    let moderator = app.register("John Moderator", "moderator").await;
    let session = app.create_session(moderator, minutes).await;
    let base = format!("/api/v1/sessions/{}", session);

    let mut participants = Vec::new();
    for name in names {
        let id = app.register(name, "participant").await;
        let (status, _) = app.post(&format!("{base}/join"), json!({}), Some(id)).await;
        assert_eq!(status, StatusCode::OK);
        participants.push(id);
    }
    let (status, _) = app
        .post(&format!("{base}/start"), json!({}), Some(moderator))
        .await;
    assert_eq!(status, StatusCode::OK);

    Room {
        app,
        moderator,
        participants,
        base,
    }
}

impl Room {
    async fn event(&self, actor: Uuid, event: Value) -> (StatusCode, Value) {
        self.app
            .post(&format!("{}/events", self.base), event, Some(actor))
            .await
    }

    async fn unmute(&self, user: Uuid) {
        let (status, _) = self
            .event(user, json!({"type": "mic_toggled", "user_id": user, "muted": false}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn speak(&self, user: Uuid, seconds: u32) -> (StatusCode, Value) {
        self.event(user, json!({"type": "spoke", "user_id": user, "seconds": seconds}))
            .await
    }
}

#[tokio::test]
async fn test_balance_of_uneven_discussion() {
    let room = live_room(&["Ana", "Ben", "Cleo", "Dev"], 10).await;
    for (user, seconds) in room.participants.iter().zip([120, 85, 210, 45]) {
        room.unmute(*user).await;
        let (status, body) = room.speak(*user, seconds).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["credited_seconds"], seconds);
    }

    let (status, report) = room
        .app
        .get(&format!("{}/participation", room.base), Some(room.moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "active");

    let balance = &report["balance"];
    assert_eq!(balance["score"], 47.0);
    assert_eq!(balance["display_score"], 47);
    assert_eq!(balance["label"], "poor");
    assert_eq!(balance["sample_size"], 4);
    assert_eq!(balance["mean_seconds"], 115.0);
    assert!(balance["advisory"].is_string());

    let members = report["members"].as_array().unwrap();
    assert_eq!(members[0]["name"], "Cleo");
    assert_eq!(members[0]["participation_seconds"], 210);
    assert_eq!(members[0]["share_percent"], 35);
}

#[tokio::test]
async fn test_even_discussion_is_excellent() {
    let room = live_room(&["Ana", "Ben"], 10).await;
    for user in &room.participants {
        room.unmute(*user).await;
        room.speak(*user, 90).await;
    }

    let (_, report) = room
        .app
        .get(&format!("{}/participation", room.base), Some(room.participants[0]))
        .await;
    assert_eq!(report["balance"]["score"], 100.0);
    assert_eq!(report["balance"]["label"], "excellent");
    assert!(report["balance"]["advisory"].is_null());
}

#[tokio::test]
async fn test_no_activity_reports_no_data() {
    let room = live_room(&["Ana", "Ben"], 10).await;
    let (_, report) = room
        .app
        .get(&format!("{}/participation", room.base), Some(room.moderator))
        .await;
    assert!(report["balance"]["score"].is_null());
    assert_eq!(report["balance"]["label"], "no_data");
}

#[tokio::test]
async fn test_muted_speech_is_not_credited() {
    let room = live_room(&["Ana"], 10).await;
    let ana = room.participants[0];

    let (status, body) = room.speak(ana, 30).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credited_seconds"], 0);
    assert_eq!(body["member"]["mic_muted"], true);
}

#[tokio::test]
async fn test_event_permissions_and_validation() {
    let room = live_room(&["Ana", "Ben"], 1).await;
    let (ana, ben) = (room.participants[0], room.participants[1]);

    let (status, _) = room
        .event(ana, json!({"type": "hand_toggled", "user_id": ben, "raised": true}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = room
        .event(room.moderator, json!({"type": "hand_toggled", "user_id": ben, "raised": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["hand_raised"], true);

    let (status, _) = room.speak(ana, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = room.speak(ana, 61).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = room
        .event(ana, json!({"type": "joined", "user_id": ana, "role": "evaluator"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let outsider = room.app.register("Out Sider", "participant").await;
    let (status, _) = room.speak(outsider, 10).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_left_member_cannot_speak_until_rejoined() {
    let room = live_room(&["Ana"], 10).await;
    let ana = room.participants[0];

    room.event(ana, json!({"type": "left", "user_id": ana})).await;
    let (status, _) = room.speak(ana, 10).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = room
        .event(ana, json!({"type": "joined", "user_id": ana, "role": "participant"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["present"], true);
}

#[tokio::test]
async fn test_chat_messages_credit_bonus() {
    let room = live_room(&["Ana"], 10).await;
    let ana = room.participants[0];

    let (status, body) = room
        .app
        .post(
            &format!("{}/messages", room.base),
            json!({"content": "  I think flexibility matters most  "}),
            Some(ana),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "I think flexibility matters most");
    assert_eq!(body["sender_name"], "Ana");

    let (status, messages) = room
        .app
        .get(&format!("{}/messages", room.base), Some(room.moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages.as_array().unwrap().len(), 1);

    let (_, report) = room
        .app
        .get(&format!("{}/participation", room.base), Some(ana))
        .await;
    assert_eq!(report["members"][0]["participation_seconds"], 5);

    let (status, _) = room
        .app
        .post(&format!("{}/messages", room.base), json!({"content": ""}), Some(ana))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_rejected_after_session_ends() {
    let room = live_room(&["Ana"], 10).await;
    let ana = room.participants[0];
    room.app
        .post(&format!("{}/end", room.base), json!({}), Some(room.moderator))
        .await;

    let (status, _) = room.speak(ana, 10).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, report) = room
        .app
        .get(&format!("{}/participation", room.base), Some(ana))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "completed");
}
