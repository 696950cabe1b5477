//! Participation Service
//!
//! Records what members do in a live session and reports how evenly the
//! speaking time was shared.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::services::{
    MemberActivity, ParticipationEvent, ParticipationTracker, TrackerError,
};
use crate::domain::{
    BalanceReport, BalanceThresholds, ChatMessage, MessageRepository, Session, SessionRepository,
    SessionStatus, UserRepository, UserRole, MAX_MESSAGE_LENGTH,
};
use crate::infrastructure::cache::TrackerCache;
use crate::infrastructure::metrics;
use crate::shared::clock::Clock;
use crate::shared::error::AppError;

/// Participation service trait
#[async_trait]
pub trait ParticipationService: Send + Sync {
    /// Apply one event to a live session on behalf of `actor`.
    async fn record_event(
        &self,
        actor: Uuid,
        session_id: Uuid,
        event: ParticipationEvent,
    ) -> Result<EventOutcome, ParticipationError>;

    /// Post a chat message; the sender is credited the message bonus.
    async fn send_message(
        &self,
        actor: Uuid,
        session_id: Uuid,
        content: &str,
    ) -> Result<ChatMessage, ParticipationError>;

    async fn list_messages(&self, actor: Uuid, session_id: Uuid) -> Result<Vec<ChatMessage>, ParticipationError>;

    /// Shares and balance for a session in any state.
    async fn report(&self, session_id: Uuid) -> Result<ParticipationReport, ParticipationError>;
}

/// Result of applying an event.
#[derive(Debug, Clone, Serialize)]
pub struct EventOutcome {
    pub credited_seconds: u64,
    pub member: MemberActivity,
}

/// One row of the participation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberReport {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub participation_seconds: u64,
    pub share_percent: u8,
    pub mic_muted: bool,
    pub hand_raised: bool,
    pub present: bool,
}

/// Participation of a whole session.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationReport {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub duration_minutes: u32,
    /// Most active first
    pub members: Vec<MemberReport>,
    pub balance: BalanceReport,
}

/// Participation service errors
#[derive(Debug, thiserror::Error)]
pub enum ParticipationError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session is {0}, participation is only recorded while active")]
    NotActive(SessionStatus),

    #[error("You are not a member of this session")]
    NotMember,

    #[error("Only the moderator can record events for other members")]
    NotPermitted,

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Message must be 1-2000 characters")]
    InvalidMessage,

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<ParticipationError> for AppError {
    fn from(err: ParticipationError) -> Self {
        match err {
            ParticipationError::SessionNotFound => AppError::NotFound(err.to_string()),
            ParticipationError::NotActive(_) => AppError::Conflict(err.to_string()),
            ParticipationError::NotMember | ParticipationError::NotPermitted => {
                AppError::Forbidden(err.to_string())
            }
            ParticipationError::InvalidEvent(_) | ParticipationError::InvalidMessage => {
                AppError::BadRequest(err.to_string())
            }
            ParticipationError::Tracker(TrackerError::UnknownMember(_)) => {
                AppError::BadRequest(err.to_string())
            }
            ParticipationError::Tracker(TrackerError::NotPresent(_)) => {
                AppError::Conflict(err.to_string())
            }
            ParticipationError::Repository(e) => e,
        }
    }
}

/// ParticipationService implementation
pub struct ParticipationServiceImpl<S, U, M>
where
    S: SessionRepository,
    U: UserRepository,
    M: MessageRepository,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
    message_repo: Arc<M>,
    trackers: Arc<TrackerCache>,
    clock: Arc<dyn Clock>,
    thresholds: BalanceThresholds,
    message_bonus_seconds: u32,
}

impl<S, U, M> ParticipationServiceImpl<S, U, M>
where
    S: SessionRepository,
    U: UserRepository,
    M: MessageRepository,
{
    pub fn new(
        session_repo: Arc<S>,
        user_repo: Arc<U>,
        message_repo: Arc<M>,
        trackers: Arc<TrackerCache>,
        clock: Arc<dyn Clock>,
        thresholds: BalanceThresholds,
        message_bonus_seconds: u32,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
            message_repo,
            trackers,
            clock,
            thresholds,
            message_bonus_seconds,
        }
    }

    async fn load(&self, session_id: Uuid) -> Result<Session, ParticipationError> {
        self.session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(ParticipationError::SessionNotFound)
    }

    async fn load_active(&self, session_id: Uuid) -> Result<Session, ParticipationError> {
        let session = self.load(session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(ParticipationError::NotActive(session.status));
        }
        Ok(session)
    }

    /// Apply an event to the session's tracker, opening it if needed.
    fn apply(&self, session: &Session, event: &ParticipationEvent) -> Result<EventOutcome, ParticipationError> {
        self.trackers
            .open(session.id, self.message_bonus_seconds, session.roster());

        let now = self.clock.now();
        let user_id = event.user_id();
        let outcome = self
            .trackers
            .with_tracker(session.id, |tracker| {
                let credited = tracker.apply(event, now)?;
                let member = tracker
                    .member(user_id)
                    .cloned()
                    .ok_or(TrackerError::UnknownMember(user_id))?;
                Ok::<_, TrackerError>(EventOutcome {
                    credited_seconds: credited,
                    member,
                })
            })
            .ok_or_else(|| AppError::Internal(format!("tracker for session {} vanished", session.id)))??;

        metrics::record_participation_event(event.kind());
        tracing::debug!(
            session_id = %session.id,
            user_id = %user_id,
            kind = event.kind(),
            credited_seconds = outcome.credited_seconds,
            "Participation event applied"
        );
        Ok(outcome)
    }

    fn check_event(&self, session: &Session, actor: Uuid, event: &ParticipationEvent) -> Result<(), ParticipationError> {
        let actor_role = session.role_of(actor).ok_or(ParticipationError::NotMember)?;
        let subject = event.user_id();
        if subject != actor && actor_role != UserRole::Moderator {
            return Err(ParticipationError::NotPermitted);
        }

        match *event {
            ParticipationEvent::Joined { user_id, role } => match session.role_of(user_id) {
                Some(seated) if seated == role => Ok(()),
                Some(seated) => Err(ParticipationError::InvalidEvent(format!(
                    "user {} is a {} in this session, not a {}",
                    user_id, seated, role
                ))),
                None => Err(ParticipationError::InvalidEvent(format!(
                    "user {} is not part of this session",
                    user_id
                ))),
            },
            ParticipationEvent::Spoke { seconds, .. } => {
                if seconds == 0 {
                    return Err(ParticipationError::InvalidEvent(
                        "spoken seconds must be positive".into(),
                    ));
                }
                if u64::from(seconds) > session.total_seconds() {
                    return Err(ParticipationError::InvalidEvent(
                        "spoken seconds exceed the session length".into(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<S, U, M> ParticipationService for ParticipationServiceImpl<S, U, M>
where
    S: SessionRepository + 'static,
    U: UserRepository + 'static,
    M: MessageRepository + 'static,
{
    async fn record_event(
        &self,
        actor: Uuid,
        session_id: Uuid,
        event: ParticipationEvent,
    ) -> Result<EventOutcome, ParticipationError> {
        let session = self.load_active(session_id).await?;
        self.check_event(&session, actor, &event)?;
        self.apply(&session, &event)
    }

    async fn send_message(
        &self,
        actor: Uuid,
        session_id: Uuid,
        content: &str,
    ) -> Result<ChatMessage, ParticipationError> {
        let content = content.trim();
        if content.is_empty() || content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ParticipationError::InvalidMessage);
        }

        let session = self.load_active(session_id).await?;
        let role = session.role_of(actor).ok_or(ParticipationError::NotMember)?;
        let sender = self
            .user_repo
            .find_by_id(actor)
            .await?
            .ok_or(ParticipationError::NotMember)?;

        self.apply(&session, &ParticipationEvent::MessageSent { user_id: actor })?;

        let message = ChatMessage::new(
            session_id,
            actor,
            sender.name,
            role,
            content.to_string(),
            self.clock.now(),
        );
        Ok(self.message_repo.append(&message).await?)
    }

    async fn list_messages(&self, actor: Uuid, session_id: Uuid) -> Result<Vec<ChatMessage>, ParticipationError> {
        let session = self.load(session_id).await?;
        if session.role_of(actor).is_none() {
            return Err(ParticipationError::NotMember);
        }
        Ok(self.message_repo.list_by_session(session_id).await?)
    }

    async fn report(&self, session_id: Uuid) -> Result<ParticipationReport, ParticipationError> {
        let session = self.load(session_id).await?;
        let tracker = self.trackers.snapshot(session_id).unwrap_or_else(|| {
            ParticipationTracker::with_roster(session_id, self.message_bonus_seconds, session.roster())
        });

        let names: HashMap<Uuid, String> = self
            .user_repo
            .list()
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let members = tracker
            .snapshot(session.duration_minutes)
            .into_iter()
            .map(|share| MemberReport {
                user_id: share.user_id,
                name: names.get(&share.user_id).cloned().unwrap_or_default(),
                role: share.role,
                participation_seconds: share.participation_seconds,
                share_percent: share.share_percent,
                mic_muted: share.mic_muted,
                hand_raised: share.hand_raised,
                present: share.present,
            })
            .collect();

        let balance = tracker.balance(&self.thresholds);

        Ok(ParticipationReport {
            session_id,
            status: session.status,
            duration_minutes: session.duration_minutes,
            members,
            balance,
        })
    }
}
