//! User Repository Implementation
//!
//! In-memory implementation of the UserRepository trait.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// In-memory user store.
///
/// Users are keyed by id with a secondary index on normalized email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
    by_email: DashMap<String, Uuid>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let key = User::normalize_email(email);
        let Some(id) = self.by_email.get(&key).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let key = User::normalize_email(&user.email);

        // Reserve the email first so two concurrent registrations cannot both win.
        match self.by_email.entry(key) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict("Email already registered".into()));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, role = %user.role, "User stored");
        Ok(user.clone())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.by_email.contains_key(&User::normalize_email(email)))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }
}
