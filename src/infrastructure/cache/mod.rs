//! Cache Module
//!
//! Process-local state that lives only while a session is running.
//!
//! - **TrackerCache**: one `ParticipationTracker` per session, keyed by
//!   session id

mod tracker_cache;

pub use tracker_cache::TrackerCache;
