//! Participation tracking domain service.
//!
//! Folds a stream of [`ParticipationEvent`]s into per-member activity for one
//! session. Time only accumulates through explicit events, so the same event
//! sequence always yields the same totals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::participation_balance::ParticipationBalance;
use crate::domain::value_objects::{BalanceReport, BalanceThresholds, UserRole};

/// Seconds credited for sending a chat message.
pub const DEFAULT_MESSAGE_BONUS_SECONDS: u32 = 5;

/// Something a session member did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParticipationEvent {
    Joined { user_id: Uuid, role: UserRole },
    Left { user_id: Uuid },
    MicToggled { user_id: Uuid, muted: bool },
    HandToggled { user_id: Uuid, raised: bool },
    /// The member spoke for `seconds`. Ignored while muted.
    Spoke { user_id: Uuid, seconds: u32 },
    MessageSent { user_id: Uuid },
}

impl ParticipationEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            Self::Joined { user_id, .. }
            | Self::Left { user_id }
            | Self::MicToggled { user_id, .. }
            | Self::HandToggled { user_id, .. }
            | Self::Spoke { user_id, .. }
            | Self::MessageSent { user_id } => *user_id,
        }
    }

    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Joined { .. } => "joined",
            Self::Left { .. } => "left",
            Self::MicToggled { .. } => "mic_toggled",
            Self::HandToggled { .. } => "hand_toggled",
            Self::Spoke { .. } => "spoke",
            Self::MessageSent { .. } => "message_sent",
        }
    }
}

/// Event could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("user {0} is not part of this session")]
    UnknownMember(Uuid),

    #[error("user {0} has left the session")]
    NotPresent(Uuid),
}

/// Live state of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberActivity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub participation_seconds: u64,
    pub mic_muted: bool,
    pub hand_raised: bool,
    pub present: bool,
    pub last_active: Option<DateTime<Utc>>,
}

impl MemberActivity {
    fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            participation_seconds: 0,
            mic_muted: true,
            hand_raised: false,
            present: true,
            last_active: None,
        }
    }

    fn credit(&mut self, seconds: u32, at: DateTime<Utc>) -> u64 {
        self.participation_seconds = self
            .participation_seconds
            .saturating_add(u64::from(seconds));
        self.last_active = Some(at);
        u64::from(seconds)
    }
}

/// A member's time as a share of the session, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberShare {
    pub user_id: Uuid,
    pub role: UserRole,
    pub participation_seconds: u64,
    pub share_percent: u8,
    pub mic_muted: bool,
    pub hand_raised: bool,
    pub present: bool,
}

/// Activity of all members of one session.
#[derive(Debug, Clone)]
pub struct ParticipationTracker {
    session_id: Uuid,
    members: HashMap<Uuid, MemberActivity>,
    message_bonus_seconds: u32,
    events_applied: u64,
}

impl ParticipationTracker {
    pub fn new(session_id: Uuid, message_bonus_seconds: u32) -> Self {
        Self {
            session_id,
            members: HashMap::new(),
            message_bonus_seconds,
            events_applied: 0,
        }
    }

    /// Tracker pre-populated with a roster, everyone muted at zero.
    pub fn with_roster(
        session_id: Uuid,
        message_bonus_seconds: u32,
        roster: impl IntoIterator<Item = (Uuid, UserRole)>,
    ) -> Self {
        let mut tracker = Self::new(session_id, message_bonus_seconds);
        for (user_id, role) in roster {
            tracker
                .members
                .insert(user_id, MemberActivity::new(user_id, role));
        }
        tracker
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }

    pub fn member(&self, user_id: Uuid) -> Option<&MemberActivity> {
        self.members.get(&user_id)
    }

    /// Apply one event. Returns the seconds credited by it.
    pub fn apply(&mut self, event: &ParticipationEvent, at: DateTime<Utc>) -> Result<u64, TrackerError> {
        let credited = match *event {
            ParticipationEvent::Joined { user_id, role } => {
                let member = self
                    .members
                    .entry(user_id)
                    .or_insert_with(|| MemberActivity::new(user_id, role));
                member.present = true;
                0
            }
            ParticipationEvent::Left { user_id } => {
                let member = self.present_member(user_id)?;
                member.present = false;
                member.hand_raised = false;
                member.mic_muted = true;
                0
            }
            ParticipationEvent::MicToggled { user_id, muted } => {
                self.present_member(user_id)?.mic_muted = muted;
                0
            }
            ParticipationEvent::HandToggled { user_id, raised } => {
                self.present_member(user_id)?.hand_raised = raised;
                0
            }
            ParticipationEvent::Spoke { user_id, seconds } => {
                let member = self.present_member(user_id)?;
                if member.mic_muted {
                    0
                } else {
                    member.credit(seconds, at)
                }
            }
            ParticipationEvent::MessageSent { user_id } => {
                let bonus = self.message_bonus_seconds;
                self.present_member(user_id)?.credit(bonus, at)
            }
        };

        self.events_applied += 1;
        Ok(credited)
    }

    /// Apply events in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a ParticipationEvent>,
        at: DateTime<Utc>,
    ) -> Result<u64, TrackerError> {
        let mut total = 0;
        for event in events {
            total += self.apply(event, at)?;
        }
        Ok(total)
    }

    fn present_member(&mut self, user_id: Uuid) -> Result<&mut MemberActivity, TrackerError> {
        let member = self
            .members
            .get_mut(&user_id)
            .ok_or(TrackerError::UnknownMember(user_id))?;
        if !member.present {
            return Err(TrackerError::NotPresent(user_id));
        }
        Ok(member)
    }

    /// Members sorted by participation time, most active first.
    pub fn snapshot(&self, duration_minutes: u32) -> Vec<MemberShare> {
        let mut shares: Vec<MemberShare> = self
            .members
            .values()
            .map(|m| MemberShare {
                user_id: m.user_id,
                role: m.role,
                participation_seconds: m.participation_seconds,
                share_percent: ParticipationBalance::share_of_session(
                    m.participation_seconds,
                    duration_minutes,
                ),
                mic_muted: m.mic_muted,
                hand_raised: m.hand_raised,
                present: m.present,
            })
            .collect();

        shares.sort_by(|a, b| {
            b.participation_seconds
                .cmp(&a.participation_seconds)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        shares
    }

    /// Times of participant-role members, including those who left.
    pub fn participant_times(&self) -> Vec<f64> {
        self.members
            .values()
            .filter(|m| m.role.is_scored())
            .map(|m| m.participation_seconds as f64)
            .collect()
    }

    /// Balance among participant-role members only.
    pub fn balance(&self, thresholds: &BalanceThresholds) -> BalanceReport {
        ParticipationBalance::evaluate(&self.participant_times(), thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::BalanceLabel;
    use pretty_assertions::assert_eq;

    struct Room {
        tracker: ParticipationTracker,
        moderator: Uuid,
        alice: Uuid,
        bob: Uuid,
        evaluator: Uuid,
    }

    fn room() -> Room {
        let moderator = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let evaluator = Uuid::new_v4();
        let tracker = ParticipationTracker::with_roster(
            Uuid::new_v4(),
            DEFAULT_MESSAGE_BONUS_SECONDS,
            [
                (moderator, UserRole::Moderator),
                (alice, UserRole::Participant),
                (bob, UserRole::Participant),
                (evaluator, UserRole::Evaluator),
            ],
        );
        Room {
            tracker,
            moderator,
            alice,
            bob,
            evaluator,
        }
    }

    fn unmute(user_id: Uuid) -> ParticipationEvent {
        ParticipationEvent::MicToggled {
            user_id,
            muted: false,
        }
    }

    fn spoke(user_id: Uuid, seconds: u32) -> ParticipationEvent {
        ParticipationEvent::Spoke { user_id, seconds }
    }

    #[test]
    fn test_muted_speech_is_not_credited() {
        let mut r = room();
        let now = Utc::now();

        assert_eq!(r.tracker.apply(&spoke(r.alice, 10), now), Ok(0));
        r.tracker.apply(&unmute(r.alice), now).unwrap();
        assert_eq!(r.tracker.apply(&spoke(r.alice, 10), now), Ok(10));

        let alice = r.tracker.member(r.alice).unwrap();
        assert_eq!(alice.participation_seconds, 10);
        assert_eq!(alice.last_active, Some(now));
        assert_eq!(r.tracker.events_applied(), 3);
    }

    #[test]
    fn test_message_bonus_applies_even_when_muted() {
        let mut r = room();
        let now = Utc::now();
        let credited = r
            .tracker
            .apply(&ParticipationEvent::MessageSent { user_id: r.bob }, now)
            .unwrap();
        assert_eq!(credited, 5);
        assert_eq!(r.tracker.member(r.bob).unwrap().participation_seconds, 5);
    }

    #[test]
    fn test_unknown_and_departed_members_are_rejected() {
        let mut r = room();
        let now = Utc::now();
        let stranger = Uuid::new_v4();

        assert_eq!(
            r.tracker.apply(&spoke(stranger, 1), now),
            Err(TrackerError::UnknownMember(stranger))
        );

        r.tracker.apply(&unmute(r.alice), now).unwrap();
        r.tracker.apply(&spoke(r.alice, 30), now).unwrap();
        r.tracker
            .apply(&ParticipationEvent::Left { user_id: r.alice }, now)
            .unwrap();
        assert_eq!(
            r.tracker.apply(&spoke(r.alice, 1), now),
            Err(TrackerError::NotPresent(r.alice))
        );

        // Time spoken before leaving still counts.
        assert_eq!(r.tracker.member(r.alice).unwrap().participation_seconds, 30);

        // Rejoining keeps the tally and resets to muted.
        r.tracker
            .apply(
                &ParticipationEvent::Joined {
                    user_id: r.alice,
                    role: UserRole::Participant,
                },
                now,
            )
            .unwrap();
        let alice = r.tracker.member(r.alice).unwrap();
        assert!(alice.present);
        assert!(alice.mic_muted);
        assert_eq!(alice.participation_seconds, 30);
    }

    #[test]
    fn test_balance_ignores_moderator_and_evaluator() {
        let mut r = room();
        let now = Utc::now();
        let events = [
            unmute(r.moderator),
            spoke(r.moderator, 600),
            unmute(r.evaluator),
            spoke(r.evaluator, 5),
            unmute(r.alice),
            unmute(r.bob),
            spoke(r.alice, 100),
            spoke(r.bob, 100),
        ];
        r.tracker.apply_all(&events, now).unwrap();

        let report = r.tracker.balance(&BalanceThresholds::default());
        assert_eq!(report.sample_size, 2);
        assert_eq!(report.score, Some(100.0));
        assert_eq!(report.label, BalanceLabel::Excellent);
    }

    #[test]
    fn test_balance_without_speech_has_no_data() {
        let r = room();
        let report = r.tracker.balance(&BalanceThresholds::default());
        assert_eq!(report.label, BalanceLabel::NoData);
        assert_eq!(report.sample_size, 2);
    }

    #[test]
    fn test_snapshot_orders_by_time_and_computes_share() {
        let mut r = room();
        let now = Utc::now();
        r.tracker
            .apply_all(
                &[unmute(r.alice), unmute(r.bob), spoke(r.alice, 90), spoke(r.bob, 360)],
                now,
            )
            .unwrap();

        let snapshot = r.tracker.snapshot(60);
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].user_id, r.bob);
        assert_eq!(snapshot[0].share_percent, 10);
        assert_eq!(snapshot[1].user_id, r.alice);
        assert_eq!(snapshot[1].share_percent, 3);
        assert_eq!(snapshot[2].participation_seconds, 0);
    }

    #[test]
    fn test_same_events_same_totals() {
        let a = room();
        let (alice, bob) = (a.alice, a.bob);
        let events = vec![unmute(alice), spoke(alice, 3), spoke(bob, 9), unmute(bob), spoke(bob, 4)];

        let mut first = a.tracker.clone();
        let mut second = a.tracker.clone();
        let now = Utc::now();
        first.apply_all(&events, now).unwrap();
        second.apply_all(&events, now).unwrap();

        assert_eq!(first.snapshot(30), second.snapshot(30));
        assert_eq!(first.member(bob).unwrap().participation_seconds, 4);
    }

    #[test]
    fn test_event_wire_format() {
        let user_id = Uuid::nil();
        let event: ParticipationEvent = serde_json::from_value(serde_json::json!({
            "type": "spoke",
            "user_id": user_id,
            "seconds": 2
        }))
        .unwrap();
        assert_eq!(event, ParticipationEvent::Spoke { user_id, seconds: 2 });
        assert_eq!(event.kind(), "spoke");
        assert_eq!(event.user_id(), user_id);
    }
}
