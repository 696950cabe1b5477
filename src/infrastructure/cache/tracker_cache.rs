//! Participation Tracker Cache
//!
//! Holds the live participation tracker of every started session.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::services::ParticipationTracker;
use crate::domain::UserRole;

/// Tracker registry shared by the session and participation services.
#[derive(Default)]
pub struct TrackerCache {
    trackers: DashMap<Uuid, ParticipationTracker>,
}

impl TrackerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the tracker for a session, seeded with its roster.
    ///
    /// An existing tracker is kept as is; returns whether one was created.
    pub fn open(
        &self,
        session_id: Uuid,
        message_bonus_seconds: u32,
        roster: impl IntoIterator<Item = (Uuid, UserRole)>,
    ) -> bool {
        match self.trackers.entry(session_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ParticipationTracker::with_roster(
                    session_id,
                    message_bonus_seconds,
                    roster,
                ));
                tracing::debug!(session_id = %session_id, "Participation tracker opened");
                true
            }
        }
    }

    /// Run `f` against the session's tracker under its shard lock.
    pub fn with_tracker<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut ParticipationTracker) -> R,
    ) -> Option<R> {
        self.trackers
            .get_mut(&session_id)
            .map(|mut tracker| f(tracker.value_mut()))
    }

    /// Copy of the session's tracker.
    pub fn snapshot(&self, session_id: Uuid) -> Option<ParticipationTracker> {
        self.trackers.get(&session_id).map(|t| t.value().clone())
    }

    pub fn remove(&self, session_id: Uuid) -> Option<ParticipationTracker> {
        self.trackers.remove(&session_id).map(|(_, t)| t)
    }

    pub fn contains(&self, session_id: Uuid) -> bool {
        self.trackers.contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
