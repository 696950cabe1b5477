//! Feedback Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::parse_id;
use crate::application::dto::request::SubmitFeedbackRequest;
use crate::application::dto::response::FeedbackResponse;
use crate::application::services::FeedbackService;
use crate::domain::FeedbackSummary;
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Submit feedback for a participant
pub async fn submit_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
    Json(body): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    body.validate().map_err(validation_error)?;
    let session_id = parse_id(&session_id, "session")?;

    let feedback = state
        .feedback_service()
        .submit_feedback(current.user_id, session_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(feedback))))
}

/// Feedback of a session
pub async fn get_session_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let session_id = parse_id(&session_id, "session")?;
    let feedback = state
        .feedback_service()
        .session_feedback(current.user_id, session_id)
        .await?;
    Ok(Json(feedback.into_iter().map(FeedbackResponse::from).collect()))
}

/// Feedback the current user gave
pub async fn get_feedback_given(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let feedback = state.feedback_service().feedback_given(current.user_id).await?;
    Ok(Json(feedback.into_iter().map(FeedbackResponse::from).collect()))
}

/// Feedback the current user received
pub async fn get_feedback_received(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let feedback = state.feedback_service().feedback_received(current.user_id).await?;
    Ok(Json(feedback.into_iter().map(FeedbackResponse::from).collect()))
}

/// Averages over the feedback the current user received
pub async fn get_received_summary(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<FeedbackSummary>, AppError> {
    let summary = state.feedback_service().received_summary(current.user_id).await?;
    Ok(Json(summary))
}
