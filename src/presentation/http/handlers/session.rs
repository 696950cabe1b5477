//! Session Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::{CreateSessionRequest, SessionQueryParams};
use crate::application::dto::response::SessionResponse;
use crate::application::services::SessionService;
use crate::domain::SessionStatus;
use crate::infrastructure::scheduler::TimerStatus;
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Create a session
pub async fn create_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let session = state
        .session_service()
        .create_session(current.user_id, body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// List sessions, optionally by status
pub async fn list_sessions(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(params): Query<SessionQueryParams>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(|s| {
            SessionStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown session status: {}", s)))
        })
        .transpose()?;

    let sessions = state.session_service().list_sessions(status).await?;
    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

/// Get a session
pub async fn get_session(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let session = state.session_service().get_session(session_id).await?;
    Ok(Json(SessionResponse::from(session)))
}

pub async fn join_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let session = state
        .session_service()
        .join_session(current.user_id, session_id)
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

pub async fn leave_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let session = state
        .session_service()
        .leave_session(current.user_id, session_id)
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

/// Go live and start the countdown
pub async fn start_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let session = state
        .session_service()
        .start_session(current.user_id, session_id)
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

pub async fn pause_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<TimerStatus>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let timer = state
        .session_service()
        .pause_timer(current.user_id, session_id)
        .await?;
    Ok(Json(timer))
}

pub async fn resume_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<TimerStatus>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let timer = state
        .session_service()
        .resume_timer(current.user_id, session_id)
        .await?;
    Ok(Json(timer))
}

/// Complete the session and cancel the countdown
pub async fn end_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let session = state
        .session_service()
        .end_session(current.user_id, session_id)
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

pub async fn get_timer(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<TimerStatus>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let timer = state.session_service().timer_status(session_id).await?;
    Ok(Json(timer))
}

/// Cancel an upcoming session
pub async fn delete_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    state
        .session_service()
        .delete_session(current.user_id, session_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Moderator removes a member before the session starts
pub async fn remove_member(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let user_id = parse_id(&user_id, "user")?;
    let session = state
        .session_service()
        .remove_member(current.user_id, session_id, user_id)
        .await?;
    Ok(Json(SessionResponse::from(session)))
}
