//! User entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserRole;
use crate::shared::error::AppError;

/// Represents a platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Full display name
    pub name: String,

    /// Email address (unique, compared case-insensitively)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    /// URL to user's avatar image
    pub avatar_url: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        let avatar_url = Some(Self::generated_avatar_url(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            email: Self::normalize_email(&email),
            password_hash,
            role,
            avatar_url,
            created_at,
        }
    }

    /// Canonical form used for storage and lookups.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Initials avatar for users who never uploaded one.
    pub fn generated_avatar_url(name: &str) -> String {
        let encoded = name.split_whitespace().collect::<Vec<_>>().join("+");
        format!("https://ui-avatars.com/api/?name={}", encoded)
    }

    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderator
    }

    pub fn is_evaluator(&self) -> bool {
        self.role == UserRole::Evaluator
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            role: UserRole::default(),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for User data access operations.
///
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Store a new user. Fails with `Conflict` if the email is taken.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}
