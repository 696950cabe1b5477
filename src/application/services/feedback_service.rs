//! Feedback Service
//!
//! Evaluators rate participants once per session.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Feedback, FeedbackRepository, FeedbackSummary, Ratings, Session, SessionRepository,
    SessionStatus, UserRole,
};
use crate::shared::clock::Clock;
use crate::shared::error::AppError;

/// Feedback service trait
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Submit feedback as an evaluator of the session.
    async fn submit_feedback(
        &self,
        actor: Uuid,
        session_id: Uuid,
        input: SubmitFeedbackDto,
    ) -> Result<Feedback, FeedbackError>;

    /// Feedback of a session visible to `actor`. The moderator and
    /// evaluators see everything; participants see only their own.
    async fn session_feedback(&self, actor: Uuid, session_id: Uuid) -> Result<Vec<Feedback>, FeedbackError>;

    async fn feedback_given(&self, actor: Uuid) -> Result<Vec<Feedback>, FeedbackError>;

    async fn feedback_received(&self, actor: Uuid) -> Result<Vec<Feedback>, FeedbackError>;

    /// Per-category and overall averages of the feedback `actor` received.
    async fn received_summary(&self, actor: Uuid) -> Result<FeedbackSummary, FeedbackError>;
}

/// Feedback input, already validated at the boundary.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackDto {
    pub participant_id: Uuid,
    pub ratings: Ratings,
    pub comments: String,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
}

/// Feedback service errors
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Feedback opens once the session is live; it is {0}")]
    NotOpen(SessionStatus),

    #[error("Only evaluators of this session can submit feedback")]
    NotEvaluator,

    #[error("You are not a member of this session")]
    NotMember,

    #[error("Feedback can only be given to participants of this session")]
    InvalidTarget,

    #[error("Ratings must be between 1 and 10")]
    InvalidRatings,

    #[error("Comments are required")]
    MissingComments,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::SessionNotFound => AppError::NotFound(err.to_string()),
            FeedbackError::NotOpen(_) => AppError::Conflict(err.to_string()),
            FeedbackError::NotEvaluator | FeedbackError::NotMember => {
                AppError::Forbidden(err.to_string())
            }
            FeedbackError::InvalidTarget
            | FeedbackError::InvalidRatings
            | FeedbackError::MissingComments => AppError::BadRequest(err.to_string()),
            FeedbackError::Repository(e) => e,
        }
    }
}

/// FeedbackService implementation
pub struct FeedbackServiceImpl<S, F>
where
    S: SessionRepository,
    F: FeedbackRepository,
{
    session_repo: Arc<S>,
    feedback_repo: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<S, F> FeedbackServiceImpl<S, F>
where
    S: SessionRepository,
    F: FeedbackRepository,
{
    pub fn new(session_repo: Arc<S>, feedback_repo: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_repo,
            feedback_repo,
            clock,
        }
    }

    async fn load(&self, session_id: Uuid) -> Result<Session, FeedbackError> {
        self.session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(FeedbackError::SessionNotFound)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S, F> FeedbackService for FeedbackServiceImpl<S, F>
where
    S: SessionRepository + 'static,
    F: FeedbackRepository + 'static,
{
    async fn submit_feedback(
        &self,
        actor: Uuid,
        session_id: Uuid,
        input: SubmitFeedbackDto,
    ) -> Result<Feedback, FeedbackError> {
        let session = self.load(session_id).await?;
        if session.status == SessionStatus::Upcoming {
            return Err(FeedbackError::NotOpen(session.status));
        }
        if session.role_of(actor) != Some(UserRole::Evaluator) {
            return Err(FeedbackError::NotEvaluator);
        }
        if session.role_of(input.participant_id) != Some(UserRole::Participant) {
            return Err(FeedbackError::InvalidTarget);
        }
        if !input.ratings.is_valid() {
            return Err(FeedbackError::InvalidRatings);
        }
        let comments = input.comments.trim().to_string();
        if comments.is_empty() {
            return Err(FeedbackError::MissingComments);
        }

        let feedback = Feedback {
            id: Uuid::new_v4(),
            session_id,
            evaluator_id: actor,
            participant_id: input.participant_id,
            ratings: input.ratings,
            comments,
            strengths: non_blank(input.strengths),
            improvements: non_blank(input.improvements),
            created_at: self.clock.now(),
        };
        let created = self.feedback_repo.create(&feedback).await?;

        tracing::info!(
            session_id = %session_id,
            evaluator_id = %actor,
            participant_id = %created.participant_id,
            overall = created.overall(),
            "Feedback submitted"
        );
        Ok(created)
    }

    async fn session_feedback(&self, actor: Uuid, session_id: Uuid) -> Result<Vec<Feedback>, FeedbackError> {
        let session = self.load(session_id).await?;
        let all = self.feedback_repo.list_by_session(session_id).await?;

        match session.role_of(actor) {
            Some(UserRole::Moderator) | Some(UserRole::Evaluator) => Ok(all),
            Some(UserRole::Participant) => Ok(all
                .into_iter()
                .filter(|f| f.participant_id == actor)
                .collect()),
            None => Err(FeedbackError::NotMember),
        }
    }

    async fn feedback_given(&self, actor: Uuid) -> Result<Vec<Feedback>, FeedbackError> {
        Ok(self.feedback_repo.list_by_evaluator(actor).await?)
    }

    async fn feedback_received(&self, actor: Uuid) -> Result<Vec<Feedback>, FeedbackError> {
        Ok(self.feedback_repo.list_by_participant(actor).await?)
    }

    async fn received_summary(&self, actor: Uuid) -> Result<FeedbackSummary, FeedbackError> {
        let received = self.feedback_repo.list_by_participant(actor).await?;
        Ok(FeedbackSummary::from_feedback(&received))
    }
}
