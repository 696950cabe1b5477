//! # Domain Entities
//!
//! Core domain entities representing the main business objects.
//!
//! - **User**: Platform account with a moderator, participant or evaluator role
//! - **Session**: A discussion or interview-practice room and its members
//! - **ChatMessage**: A message posted in a session room
//! - **Feedback**: An evaluator's ratings for a participant
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod feedback;
mod message;
mod session;
mod user;

pub use user::{User, UserRepository};

#[cfg(test)]
pub use user::MockUserRepository;

pub use session::{
    Session, SessionKind, SessionMember, SessionRepository, SessionRuleError, SessionStatus,
    DEFAULT_MAX_PARTICIPANTS,
};

pub use message::{ChatMessage, MessageRepository, MAX_MESSAGE_LENGTH};

pub use feedback::{
    CategoryAverages, Feedback, FeedbackRepository, FeedbackSummary, PerformanceLevel, Ratings,
    MAX_RATING, MIN_RATING,
};
