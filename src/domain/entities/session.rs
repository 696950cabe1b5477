//! Discussion session entity and repository trait.
//!
//! A session is a group discussion or interview-practice room run by a
//! moderator. It moves strictly `upcoming -> active -> completed`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserRole;
use crate::shared::error::AppError;

/// Default cap on participant-role members.
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 10;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl SessionStatus {
    /// Parse a status filter. `pending` is accepted as an alias of `upcoming`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" | "pending" => Some(Self::Upcoming),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of practice a session offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    #[default]
    GroupDiscussion,
    Interview,
    Debate,
    Presentation,
}

/// A user's seat in a session. The moderator is not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMember {
    pub user_id: Uuid,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}

/// Broken session rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionRuleError {
    #[error("session is {0}, expected upcoming")]
    NotUpcoming(SessionStatus),

    #[error("session is {0}, expected active")]
    NotActive(SessionStatus),

    #[error("user is already a member of this session")]
    AlreadyMember,

    #[error("user is not a member of this session")]
    NotMember,

    #[error("session is full")]
    Full,

    #[error("moderators run sessions and cannot join as members")]
    ModeratorSeat,
}

/// Represents a discussion session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub topic: Option<String>,
    pub kind: SessionKind,

    /// Planned length; the countdown runs for this long.
    pub duration_minutes: u32,

    /// Scheduled start time
    pub start_time: DateTime<Utc>,

    pub status: SessionStatus,
    pub moderator_id: Uuid,
    pub max_participants: u32,
    pub members: Vec<SessionMember>,

    /// When the session actually went live
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        title: String,
        moderator_id: Uuid,
        duration_minutes: u32,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            topic: None,
            kind: SessionKind::default(),
            duration_minutes,
            start_time,
            status: SessionStatus::Upcoming,
            moderator_id,
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            members: Vec::new(),
            started_at: None,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Total planned length in seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    pub fn is_moderator(&self, user_id: Uuid) -> bool {
        self.moderator_id == user_id
    }

    pub fn member(&self, user_id: Uuid) -> Option<&SessionMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Role of `user_id` in this session, including the moderator.
    pub fn role_of(&self, user_id: Uuid) -> Option<UserRole> {
        if self.is_moderator(user_id) {
            return Some(UserRole::Moderator);
        }
        self.member(user_id).map(|m| m.role)
    }

    pub fn participant_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == UserRole::Participant)
            .count()
    }

    /// Everyone in the room, moderator first.
    pub fn roster(&self) -> Vec<(Uuid, UserRole)> {
        std::iter::once((self.moderator_id, UserRole::Moderator))
            .chain(self.members.iter().map(|m| (m.user_id, m.role)))
            .collect()
    }

    /// Add a member. Only legal while upcoming.
    pub fn add_member(
        &mut self,
        user_id: Uuid,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<(), SessionRuleError> {
        if self.status != SessionStatus::Upcoming {
            return Err(SessionRuleError::NotUpcoming(self.status));
        }
        if role == UserRole::Moderator || self.is_moderator(user_id) {
            return Err(SessionRuleError::ModeratorSeat);
        }
        if self.member(user_id).is_some() {
            return Err(SessionRuleError::AlreadyMember);
        }
        if role == UserRole::Participant
            && self.participant_count() >= self.max_participants as usize
        {
            return Err(SessionRuleError::Full);
        }

        self.members.push(SessionMember {
            user_id,
            role,
            joined_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Remove a member. Only legal while upcoming.
    pub fn remove_member(&mut self, user_id: Uuid, now: DateTime<Utc>) -> Result<(), SessionRuleError> {
        if self.status != SessionStatus::Upcoming {
            return Err(SessionRuleError::NotUpcoming(self.status));
        }
        let before = self.members.len();
        self.members.retain(|m| m.user_id != user_id);
        if self.members.len() == before {
            return Err(SessionRuleError::NotMember);
        }
        self.updated_at = now;
        Ok(())
    }

    /// upcoming -> active
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionRuleError> {
        if self.status != SessionStatus::Upcoming {
            return Err(SessionRuleError::NotUpcoming(self.status));
        }
        self.status = SessionStatus::Active;
        self.started_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// active -> completed
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), SessionRuleError> {
        if self.status != SessionStatus::Active {
            return Err(SessionRuleError::NotActive(self.status));
        }
        self.status = SessionStatus::Completed;
        self.ended_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// Repository trait for Session data access operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its UUID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError>;

    /// All sessions ordered by scheduled start time.
    async fn list(&self) -> Result<Vec<Session>, AppError>;

    /// Sessions in the given status ordered by scheduled start time.
    async fn list_by_status(&self, status: SessionStatus) -> Result<Vec<Session>, AppError>;

    /// Create a new session.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Apply `change` to the stored session while holding its entry and
    /// return the new value. Nothing is written when `change` fails, so two
    /// concurrent changes never overwrite each other.
    async fn modify<F>(
        &self,
        id: Uuid,
        change: F,
    ) -> Result<Result<Session, SessionRuleError>, AppError>
    where
        F: FnOnce(&mut Session) -> Result<(), SessionRuleError> + Send;

    /// Remove a session if `check` accepts its current state.
    async fn delete<F>(
        &self,
        id: Uuid,
        check: F,
    ) -> Result<Result<Session, SessionRuleError>, AppError>
    where
        F: FnOnce(&Session) -> Result<(), SessionRuleError> + Send;
}
