//! Custom Extractors
//!
//! Axum extractors for caller identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::{UserRepository, UserRole};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Header carrying the caller's user id. Identity is asserted by the client;
/// there are no tokens.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The registered user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".into()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-User-Id header".into()))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Unauthorized("Invalid X-User-Id header".into()))?;

        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".into()))?;

        Ok(Self {
            user_id: user.id,
            name: user.name,
            role: user.role,
        })
    }
}
