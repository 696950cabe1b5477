//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **UserService**: Registration, mock login, profiles
//! - **SessionService**: Session lifecycle and countdown control
//! - **ParticipationService**: Live events, chat and balance reports
//! - **FeedbackService**: Evaluator ratings

pub mod feedback_service;
pub mod participation_service;
pub mod session_service;
pub mod user_service;

pub use user_service::{RegisterUserDto, UserDto, UserError, UserService, UserServiceImpl};

pub use session_service::{CreateSessionDto, SessionError, SessionService, SessionServiceImpl};

pub use participation_service::{
    EventOutcome, MemberReport, ParticipationError, ParticipationReport, ParticipationService,
    ParticipationServiceImpl,
};

pub use feedback_service::{FeedbackError, FeedbackService, FeedbackServiceImpl, SubmitFeedbackDto};
