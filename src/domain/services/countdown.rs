//! Session countdown.
//!
//! Pure state machine: callers pass the current time, so tests can drive it
//! with a manual clock instead of waiting on real timers.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Longest countdown representable without overflow.
const MAX_TOTAL_SECONDS: u64 = (i64::MAX / 1000) as u64;

/// Countdown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Cancelled,
    Expired,
}

impl CountdownState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired)
    }
}

/// Illegal countdown transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a countdown that is {state:?}")]
pub struct CountdownError {
    pub action: &'static str,
    pub state: CountdownState,
}

/// Counts a fixed duration down, with pause and resume.
#[derive(Debug, Clone)]
pub struct Countdown {
    total: Duration,
    /// Time run before the current running stretch
    banked: Duration,
    running_since: Option<DateTime<Utc>>,
    state: CountdownState,
}

impl Countdown {
    pub fn new(total_seconds: u64) -> Self {
        Self {
            total: Duration::seconds(total_seconds.min(MAX_TOTAL_SECONDS) as i64),
            banked: Duration::zero(),
            running_since: None,
            state: CountdownState::Idle,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn total_seconds(&self) -> u64 {
        self.total.num_seconds().max(0) as u64
    }

    fn invalid(&self, action: &'static str) -> CountdownError {
        CountdownError {
            action,
            state: self.state,
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), CountdownError> {
        if self.state != CountdownState::Idle {
            return Err(self.invalid("start"));
        }
        self.running_since = Some(now);
        self.state = CountdownState::Running;
        Ok(())
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), CountdownError> {
        if self.poll(now) != CountdownState::Running {
            return Err(self.invalid("pause"));
        }
        self.banked = self.elapsed(now);
        self.running_since = None;
        self.state = CountdownState::Paused;
        Ok(())
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), CountdownError> {
        if self.state != CountdownState::Paused {
            return Err(self.invalid("resume"));
        }
        self.running_since = Some(now);
        self.state = CountdownState::Running;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), CountdownError> {
        if self.poll(now).is_terminal() {
            return Err(self.invalid("cancel"));
        }
        self.banked = self.elapsed(now);
        self.running_since = None;
        self.state = CountdownState::Cancelled;
        Ok(())
    }

    /// Time run so far, never more than the total.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let current = match self.running_since {
            Some(since) if now > since => now - since,
            _ => Duration::zero(),
        };
        (self.banked + current).min(self.total)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.total - self.elapsed(now)
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.remaining(now).num_seconds().max(0) as u64
    }

    /// Advance state against `now`; a running countdown with nothing left
    /// becomes expired.
    pub fn poll(&mut self, now: DateTime<Utc>) -> CountdownState {
        if self.state == CountdownState::Running && self.remaining(now) <= Duration::zero() {
            self.banked = self.total;
            self.running_since = None;
            self.state = CountdownState::Expired;
        }
        self.state
    }
}

/// `mm:ss`, minutes not wrapped at the hour.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
