//! Participation Handlers
//!
//! Live events, session chat and the participation report.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::SendMessageRequest;
use crate::application::dto::response::{MessageResponse, ParticipationResponse};
use crate::application::services::{EventOutcome, ParticipationService};
use crate::domain::services::ParticipationEvent;
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Record a participation event
pub async fn record_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
    Json(event): Json<ParticipationEvent>,
) -> Result<Json<EventOutcome>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let outcome = state
        .participation_service()
        .record_event(current.user_id, session_id, event)
        .await?;
    Ok(Json(outcome))
}

/// Session chat history
pub async fn get_messages(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let messages = state
        .participation_service()
        .list_messages(current.user_id, session_id)
        .await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Post a chat message
pub async fn send_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    body.validate().map_err(validation_error)?;
    let session_id = parse_id(&session_id, "session")?;

    let message = state
        .participation_service()
        .send_message(current.user_id, session_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// Shares and balance
pub async fn get_participation(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<ParticipationResponse>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let report = state.participation_service().report(session_id).await?;
    Ok(Json(ParticipationResponse::from(report)))
}
