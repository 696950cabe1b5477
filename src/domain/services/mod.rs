//! # Domain Services
//!
//! Stateless and in-memory domain logic that does not belong to a single
//! entity:
//!
//! - **ParticipationBalance**: balance score and share-of-session math
//! - **ParticipationTracker**: folds participation events into per-member time
//! - **Countdown**: pausable session countdown over caller-supplied time

pub mod countdown;
pub mod participation_balance;
pub mod participation_tracker;

pub use countdown::{format_mm_ss, Countdown, CountdownError, CountdownState};
pub use participation_balance::{Dispersion, ParticipationBalance};
pub use participation_tracker::{
    MemberActivity, MemberShare, ParticipationEvent, ParticipationTracker, TrackerError,
    DEFAULT_MESSAGE_BONUS_SECONDS,
};
