//! User Service
//!
//! Handles registration, mock login and profile lookup.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{User, UserRepository, UserRole};
use crate::shared::clock::Clock;
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new account
    async fn register(&self, input: RegisterUserDto) -> Result<UserDto, UserError>;

    /// Check credentials. No token is issued; callers identify themselves
    /// afterwards with the returned id.
    async fn login(&self, email: &str, password: &str, role: UserRole) -> Result<UserDto, UserError>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<UserDto, UserError>;
}

/// Registration input, already validated at the boundary.
#[derive(Debug, Clone)]
pub struct RegisterUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// User data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::EmailTaken => AppError::Conflict(err.to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, UserError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| UserError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn internal(e: AppError) -> UserError {
    match e {
        AppError::Conflict(_) => UserError::EmailTaken,
        e => UserError::Internal(e.to_string()),
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn register(&self, input: RegisterUserDto) -> Result<UserDto, UserError> {
        let email = User::normalize_email(&input.email);
        if self.user_repo.email_exists(&email).await.map_err(internal)? {
            return Err(UserError::EmailTaken);
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(
            input.name.trim().to_string(),
            email,
            password_hash,
            input.role,
            self.clock.now(),
        );
        let created = self.user_repo.create(&user).await.map_err(internal)?;

        tracing::info!(user_id = %created.id, role = %created.role, "User registered");
        Ok(UserDto::from(created))
    }

    async fn login(&self, email: &str, password: &str, role: UserRole) -> Result<UserDto, UserError> {
        let email = User::normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(internal)?
            .ok_or(UserError::InvalidCredentials)?;

        if user.role != role || !self.verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(UserDto::from(user))
    }

    async fn get_user(&self, user_id: Uuid) -> Result<UserDto, UserError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(internal)?
            .ok_or(UserError::NotFound)?;

        Ok(UserDto::from(user))
    }
}
