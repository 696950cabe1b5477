//! Chat message entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserRole;
use crate::shared::error::AppError;

/// Maximum message length in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// A chat message posted in a session room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender_id: Uuid,

    /// Sender name at the time of sending
    pub sender_name: String,
    pub sender_role: UserRole,

    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        session_id: Uuid,
        sender_id: Uuid,
        sender_name: String,
        sender_role: UserRole,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            sender_id,
            sender_name,
            sender_role,
            content: content.trim().to_string(),
            created_at,
        }
    }
}

/// Repository trait for chat history.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to its session's history.
    async fn append(&self, message: &ChatMessage) -> Result<ChatMessage, AppError>;

    /// Messages of a session, oldest first.
    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, AppError>;
}
