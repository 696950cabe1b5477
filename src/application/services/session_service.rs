//! Session Service
//!
//! Session lifecycle: scheduling, membership, going live and ending.
//! Starting a session opens its participation tracker and schedules its
//! countdown; the countdown running out completes the session.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::ParticipationSettings;
use crate::domain::services::{format_mm_ss, CountdownState};
use crate::domain::{
    BalanceThresholds, Session, SessionKind, SessionRepository, SessionRuleError, SessionStatus,
    UserRepository,
};
use crate::infrastructure::cache::TrackerCache;
use crate::infrastructure::metrics;
use crate::infrastructure::scheduler::{SchedulerError, SessionScheduler, TimerStatus};
use crate::shared::clock::Clock;
use crate::shared::error::AppError;

/// Session service trait
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Schedule a new session. Moderators only.
    async fn create_session(&self, actor: Uuid, input: CreateSessionDto) -> Result<Session, SessionError>;

    async fn get_session(&self, session_id: Uuid) -> Result<Session, SessionError>;

    /// Sessions ordered by start time, optionally filtered by status.
    async fn list_sessions(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, SessionError>;

    /// Take a seat in an upcoming session with the caller's account role.
    async fn join_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError>;

    async fn leave_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError>;

    /// Take a member off an upcoming session. Session moderator only.
    async fn remove_member(
        &self,
        actor: Uuid,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Session, SessionError>;

    /// Cancel an upcoming session. Session moderator only.
    async fn delete_session(&self, actor: Uuid, session_id: Uuid) -> Result<(), SessionError>;

    /// upcoming -> active, starting the countdown.
    async fn start_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError>;

    async fn pause_timer(&self, actor: Uuid, session_id: Uuid) -> Result<TimerStatus, SessionError>;

    async fn resume_timer(&self, actor: Uuid, session_id: Uuid) -> Result<TimerStatus, SessionError>;

    /// active -> completed, cancelling the countdown.
    async fn end_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError>;

    async fn timer_status(&self, session_id: Uuid) -> Result<TimerStatus, SessionError>;
}

/// New session input, already validated at the boundary.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionDto {
    pub title: String,
    pub description: Option<String>,
    pub topic: Option<String>,
    pub kind: SessionKind,
    pub duration_minutes: u32,
    /// Defaults to now
    pub start_time: Option<DateTime<Utc>>,
    /// Defaults to the configured cap
    pub max_participants: Option<u32>,
}

/// Session service errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Unknown user")]
    UnknownUser,

    #[error("Only moderators can create sessions")]
    NotModerator,

    #[error("Only the session's moderator can do this")]
    NotSessionModerator,

    #[error(transparent)]
    Rule(#[from] SessionRuleError),

    #[error(transparent)]
    Timer(#[from] SchedulerError),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => AppError::NotFound(err.to_string()),
            SessionError::UnknownUser => AppError::Unauthorized(err.to_string()),
            SessionError::NotModerator | SessionError::NotSessionModerator => {
                AppError::Forbidden(err.to_string())
            }
            SessionError::Rule(rule) => match rule {
                SessionRuleError::ModeratorSeat => AppError::Forbidden(rule.to_string()),
                SessionRuleError::NotMember => AppError::BadRequest(rule.to_string()),
                _ => AppError::Conflict(rule.to_string()),
            },
            SessionError::Timer(SchedulerError::NotScheduled(_)) => {
                AppError::Conflict("Session timer is not running".into())
            }
            SessionError::Timer(e) => AppError::Conflict(e.to_string()),
            SessionError::Repository(e) => e,
        }
    }
}

/// SessionService implementation
pub struct SessionServiceImpl<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
    trackers: Arc<TrackerCache>,
    scheduler: Arc<SessionScheduler>,
    clock: Arc<dyn Clock>,
    participation: ParticipationSettings,
    thresholds: BalanceThresholds,
}

impl<S, U> SessionServiceImpl<S, U>
where
    S: SessionRepository + 'static,
    U: UserRepository,
{
    pub fn new(
        session_repo: Arc<S>,
        user_repo: Arc<U>,
        trackers: Arc<TrackerCache>,
        scheduler: Arc<SessionScheduler>,
        clock: Arc<dyn Clock>,
        participation: ParticipationSettings,
        thresholds: BalanceThresholds,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
            trackers,
            scheduler,
            clock,
            participation,
            thresholds,
        }
    }

    async fn load(&self, session_id: Uuid) -> Result<Session, SessionError> {
        self.session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound)
    }

    async fn load_moderated(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError> {
        let session = self.load(session_id).await?;
        if !session.is_moderator(actor) {
            return Err(SessionError::NotSessionModerator);
        }
        Ok(session)
    }

    /// Atomically apply a state change to the stored session.
    async fn modify<F>(&self, session_id: Uuid, change: F) -> Result<Session, SessionError>
    where
        F: FnOnce(&mut Session) -> Result<(), SessionRuleError> + Send,
    {
        let updated = self
            .session_repo
            .modify(session_id, change)
            .await
            .map_err(not_found)??;
        Ok(updated)
    }
}

fn not_found(err: AppError) -> SessionError {
    match err {
        AppError::NotFound(_) => SessionError::NotFound,
        other => SessionError::Repository(other),
    }
}

/// Metrics for a session that just moved to completed. The final balance is
/// recorded here, once per session.
fn record_completion(trackers: &TrackerCache, thresholds: &BalanceThresholds, session_id: Uuid) {
    metrics::session_completed();
    if let Some(score) = final_balance(trackers, thresholds, session_id) {
        metrics::record_balance_score(score);
    }
}

fn final_balance(
    trackers: &TrackerCache,
    thresholds: &BalanceThresholds,
    session_id: Uuid,
) -> Option<f64> {
    trackers
        .snapshot(session_id)
        .and_then(|tracker| tracker.balance(thresholds).score)
}

/// Expiry callback: complete the session unless it already ended.
/// Returns whether this call made the transition.
async fn complete_expired<S>(
    session_repo: &S,
    trackers: &TrackerCache,
    thresholds: &BalanceThresholds,
    clock: &dyn Clock,
    session_id: Uuid,
) -> bool
where
    S: SessionRepository,
{
    let now = clock.now();
    match session_repo.modify(session_id, |s| s.complete(now)).await {
        Ok(Ok(_)) => {
            record_completion(trackers, thresholds, session_id);
            tracing::info!(session_id = %session_id, "Session completed on timer expiry");
            true
        }
        Ok(Err(rule)) => {
            tracing::debug!(session_id = %session_id, reason = %rule, "Expired session already ended");
            false
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to complete expired session");
            false
        }
    }
}

#[async_trait]
impl<S, U> SessionService for SessionServiceImpl<S, U>
where
    S: SessionRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_session(&self, actor: Uuid, input: CreateSessionDto) -> Result<Session, SessionError> {
        let user = self
            .user_repo
            .find_by_id(actor)
            .await?
            .ok_or(SessionError::UnknownUser)?;
        if !user.is_moderator() {
            return Err(SessionError::NotModerator);
        }

        let now = self.clock.now();
        let mut session = Session::new(
            input.title.trim().to_string(),
            actor,
            input.duration_minutes,
            input.start_time.unwrap_or(now),
            now,
        );
        session.description = input.description;
        session.topic = input.topic;
        session.kind = input.kind;
        session.max_participants = input
            .max_participants
            .unwrap_or(self.participation.max_participants);

        let created = self.session_repo.create(&session).await?;
        tracing::info!(
            session_id = %created.id,
            moderator_id = %actor,
            duration_minutes = created.duration_minutes,
            "Session created"
        );
        Ok(created)
    }

    async fn get_session(&self, session_id: Uuid) -> Result<Session, SessionError> {
        self.load(session_id).await
    }

    async fn list_sessions(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, SessionError> {
        let sessions = match status {
            Some(status) => self.session_repo.list_by_status(status).await?,
            None => self.session_repo.list().await?,
        };
        Ok(sessions)
    }

    async fn join_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError> {
        let user = self
            .user_repo
            .find_by_id(actor)
            .await?
            .ok_or(SessionError::UnknownUser)?;
        let now = self.clock.now();
        let updated = self
            .modify(session_id, |s| s.add_member(user.id, user.role, now))
            .await?;

        tracing::info!(session_id = %session_id, user_id = %actor, role = %user.role, "Member joined session");
        Ok(updated)
    }

    async fn leave_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let updated = self
            .modify(session_id, |s| s.remove_member(actor, now))
            .await?;

        tracing::info!(session_id = %session_id, user_id = %actor, "Member left session");
        Ok(updated)
    }

    async fn remove_member(
        &self,
        actor: Uuid,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Session, SessionError> {
        self.load_moderated(actor, session_id).await?;
        let now = self.clock.now();
        let updated = self
            .modify(session_id, |s| s.remove_member(user_id, now))
            .await?;

        tracing::info!(
            session_id = %session_id,
            moderator_id = %actor,
            user_id = %user_id,
            "Member removed from session"
        );
        Ok(updated)
    }

    async fn delete_session(&self, actor: Uuid, session_id: Uuid) -> Result<(), SessionError> {
        self.load_moderated(actor, session_id).await?;
        self.session_repo
            .delete(session_id, |s| match s.status {
                SessionStatus::Upcoming => Ok(()),
                status => Err(SessionRuleError::NotUpcoming(status)),
            })
            .await
            .map_err(not_found)??;

        tracing::info!(session_id = %session_id, moderator_id = %actor, "Session deleted");
        Ok(())
    }

    async fn start_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError> {
        self.load_moderated(actor, session_id).await?;
        let now = self.clock.now();
        let updated = self.modify(session_id, |s| s.start(now)).await?;

        self.trackers.open(
            session_id,
            self.participation.message_bonus_seconds,
            updated.roster(),
        );

        let session_repo = self.session_repo.clone();
        let trackers = self.trackers.clone();
        let thresholds = self.thresholds;
        let clock = self.clock.clone();
        self.scheduler
            .schedule(session_id, updated.total_seconds(), move |id| async move {
                complete_expired(session_repo.as_ref(), &trackers, &thresholds, clock.as_ref(), id)
                    .await;
            })?;

        metrics::session_started();
        tracing::info!(
            session_id = %session_id,
            members = updated.members.len(),
            total_seconds = updated.total_seconds(),
            "Session started"
        );
        Ok(updated)
    }

    async fn pause_timer(&self, actor: Uuid, session_id: Uuid) -> Result<TimerStatus, SessionError> {
        let session = self.load_moderated(actor, session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(SessionRuleError::NotActive(session.status).into());
        }
        Ok(self.scheduler.pause(session_id)?)
    }

    async fn resume_timer(&self, actor: Uuid, session_id: Uuid) -> Result<TimerStatus, SessionError> {
        let session = self.load_moderated(actor, session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(SessionRuleError::NotActive(session.status).into());
        }
        Ok(self.scheduler.resume(session_id)?)
    }

    async fn end_session(&self, actor: Uuid, session_id: Uuid) -> Result<Session, SessionError> {
        self.load_moderated(actor, session_id).await?;
        let now = self.clock.now();
        let updated = self.modify(session_id, |s| s.complete(now)).await?;

        if let Err(e) = self.scheduler.cancel(session_id) {
            tracing::debug!(session_id = %session_id, error = %e, "No countdown to cancel");
        }
        record_completion(&self.trackers, &self.thresholds, session_id);
        tracing::info!(session_id = %session_id, "Session ended by moderator");
        Ok(updated)
    }

    async fn timer_status(&self, session_id: Uuid) -> Result<TimerStatus, SessionError> {
        let session = self.load(session_id).await?;
        if let Some(status) = self.scheduler.status(session_id) {
            return Ok(status);
        }

        // Never started, or started before a restart
        let total = session.total_seconds();
        let (state, remaining) = match session.status {
            SessionStatus::Upcoming => (CountdownState::Idle, total),
            SessionStatus::Active => (CountdownState::Running, total),
            SessionStatus::Completed => (CountdownState::Expired, 0),
        };
        Ok(TimerStatus {
            state,
            total_seconds: total,
            remaining_seconds: remaining,
            display: format_mm_ss(remaining),
        })
    }
}
