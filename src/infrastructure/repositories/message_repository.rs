//! Message Repository Implementation
//!
//! In-memory chat history, one append-only log per session.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{ChatMessage, MessageRepository};
use crate::shared::error::AppError;

/// In-memory message store.
#[derive(Default)]
pub struct InMemoryMessageRepository {
    by_session: DashMap<Uuid, Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        self.by_session
            .entry(message.session_id)
            .or_default()
            .push(message.clone());
        Ok(message.clone())
    }

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        Ok(self
            .by_session
            .get(&session_id)
            .map(|log| log.value().clone())
            .unwrap_or_default())
    }
}
