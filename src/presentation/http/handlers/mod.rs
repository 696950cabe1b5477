//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

use uuid::Uuid;

use crate::shared::error::AppError;

pub mod auth;
pub mod feedback;
pub mod health;
pub mod participation;
pub mod session;
pub mod user;

/// Parse a path id, reporting which kind of id was malformed.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}
