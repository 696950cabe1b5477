//! Session Repository Implementation
//!
//! In-memory implementation of the SessionRepository trait.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{Session, SessionRepository, SessionRuleError, SessionStatus};
use crate::shared::error::AppError;

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: DashMap<Uuid, Session>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut sessions: Vec<Session>) -> Vec<Session> {
        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        sessions
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.get(&id).map(|s| s.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Session>, AppError> {
        Ok(Self::sorted(
            self.sessions.iter().map(|s| s.value().clone()).collect(),
        ))
    }

    async fn list_by_status(&self, status: SessionStatus) -> Result<Vec<Session>, AppError> {
        Ok(Self::sorted(
            self.sessions
                .iter()
                .filter(|s| s.status == status)
                .map(|s| s.value().clone())
                .collect(),
        ))
    }

    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        if self.sessions.contains_key(&session.id) {
            return Err(AppError::Conflict("Session already exists".into()));
        }
        self.sessions.insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn modify<F>(
        &self,
        id: Uuid,
        change: F,
    ) -> Result<Result<Session, SessionRuleError>, AppError>
    where
        F: FnOnce(&mut Session) -> Result<(), SessionRuleError> + Send,
    {
        let mut stored = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Session not found".into()))?;
        let mut next = stored.value().clone();
        if let Err(rule) = change(&mut next) {
            return Ok(Err(rule));
        }
        *stored = next.clone();
        Ok(Ok(next))
    }

    async fn delete<F>(
        &self,
        id: Uuid,
        check: F,
    ) -> Result<Result<Session, SessionRuleError>, AppError>
    where
        F: FnOnce(&Session) -> Result<(), SessionRuleError> + Send,
    {
        match self.sessions.entry(id) {
            Entry::Vacant(_) => Err(AppError::NotFound("Session not found".into())),
            Entry::Occupied(entry) => {
                if let Err(rule) = check(entry.get()) {
                    return Ok(Err(rule));
                }
                Ok(Ok(entry.remove()))
            }
        }
    }
}
