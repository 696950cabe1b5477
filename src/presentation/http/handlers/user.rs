//! User Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::parse_id;
use crate::application::dto::response::UserResponse;
use crate::application::services::UserService;
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Get current user
pub async fn get_current_user(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().get_user(current.user_id).await?;
    Ok(Json(UserResponse::from_dto(user, true)))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let user = state.user_service().get_user(user_id).await?;

    // Don't include email for other users
    Ok(Json(UserResponse::from_dto(user, false)))
}
