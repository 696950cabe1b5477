//! Authentication Handlers
//!
//! Registration and mock login. Login checks credentials and returns the
//! user; the client then identifies itself with the `X-User-Id` header.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::UserResponse;
use crate::application::services::UserService;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let user = state.user_service().register(body.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_dto(user, true))))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let user = state
        .user_service()
        .login(&body.email, &body.password, body.role)
        .await?;

    Ok(Json(UserResponse::from_dto(user, true)))
}
