//! Session Scheduler
//!
//! Runs one countdown task per live session. Each task polls its
//! [`Countdown`] against the injected [`Clock`] every tick and fires the
//! expiry callback exactly once when time runs out. Pausing freezes the
//! countdown; cancelling aborts the task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::domain::services::{format_mm_ss, Countdown, CountdownError, CountdownState};
use crate::infrastructure::metrics;
use crate::shared::clock::Clock;

/// Scheduler errors
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("no countdown scheduled for session {0}")]
    NotScheduled(Uuid),

    #[error("a countdown is already scheduled for session {0}")]
    AlreadyScheduled(Uuid),

    #[error(transparent)]
    Countdown(#[from] CountdownError),
}

/// Point-in-time view of a session countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerStatus {
    pub state: CountdownState,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    /// `mm:ss` rendering of the remaining time
    pub display: String,
}

/// Owns the countdowns and their polling tasks.
pub struct SessionScheduler {
    clock: Arc<dyn Clock>,
    tick: Duration,
    countdowns: DashMap<Uuid, Arc<Mutex<Countdown>>>,
    tasks: DashMap<Uuid, JoinHandle<()>>,
}

impl SessionScheduler {
    pub fn new(clock: Arc<dyn Clock>, tick: Duration) -> Self {
        Self {
            clock,
            tick,
            countdowns: DashMap::new(),
            tasks: DashMap::new(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// Start a countdown of `total_seconds` for a session.
    ///
    /// `on_expire` runs once, on the scheduler task, when the countdown
    /// reaches zero while running. Must be called inside a tokio runtime.
    pub fn schedule<F, Fut>(
        &self,
        session_id: Uuid,
        total_seconds: u64,
        on_expire: F,
    ) -> Result<TimerStatus, SchedulerError>
    where
        F: FnOnce(Uuid) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let countdown = match self.countdowns.entry(session_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(SchedulerError::AlreadyScheduled(session_id));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let mut countdown = Countdown::new(total_seconds);
                countdown.start(self.clock.now())?;
                slot.insert(Arc::new(Mutex::new(countdown))).value().clone()
            }
        };

        let clock = self.clock.clone();
        let tick = self.tick;
        let polled = countdown.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let state = polled.lock().poll(clock.now());
                match state {
                    CountdownState::Expired => {
                        tracing::info!(session_id = %session_id, "Session countdown expired");
                        metrics::record_timer_expiry();
                        on_expire(session_id).await;
                        break;
                    }
                    CountdownState::Cancelled => break,
                    _ => {}
                }
            }
        });
        self.tasks.insert(session_id, handle);

        tracing::debug!(
            session_id = %session_id,
            total_seconds = total_seconds,
            "Session countdown scheduled"
        );
        Ok(self.view(&countdown))
    }

    fn countdown(&self, session_id: Uuid) -> Result<Arc<Mutex<Countdown>>, SchedulerError> {
        self.countdowns
            .get(&session_id)
            .map(|c| c.value().clone())
            .ok_or(SchedulerError::NotScheduled(session_id))
    }

    fn view(&self, countdown: &Mutex<Countdown>) -> TimerStatus {
        let now = self.clock.now();
        let mut countdown = countdown.lock();
        let state = countdown.poll(now);
        let remaining = countdown.remaining_seconds(now);
        TimerStatus {
            state,
            total_seconds: countdown.total_seconds(),
            remaining_seconds: remaining,
            display: format_mm_ss(remaining),
        }
    }

    pub fn pause(&self, session_id: Uuid) -> Result<TimerStatus, SchedulerError> {
        let countdown = self.countdown(session_id)?;
        countdown.lock().pause(self.clock.now())?;
        tracing::debug!(session_id = %session_id, "Session countdown paused");
        Ok(self.view(&countdown))
    }

    pub fn resume(&self, session_id: Uuid) -> Result<TimerStatus, SchedulerError> {
        let countdown = self.countdown(session_id)?;
        countdown.lock().resume(self.clock.now())?;
        tracing::debug!(session_id = %session_id, "Session countdown resumed");
        Ok(self.view(&countdown))
    }

    /// Stop the countdown without firing the expiry callback.
    ///
    /// The countdown itself is kept so its final state can still be read.
    pub fn cancel(&self, session_id: Uuid) -> Result<TimerStatus, SchedulerError> {
        let countdown = self.countdown(session_id)?;
        let cancelled = countdown.lock().cancel(self.clock.now());
        if let Some((_, task)) = self.tasks.remove(&session_id) {
            task.abort();
        }
        cancelled?;
        tracing::debug!(session_id = %session_id, "Session countdown cancelled");
        Ok(self.view(&countdown))
    }

    pub fn status(&self, session_id: Uuid) -> Option<TimerStatus> {
        self.countdowns
            .get(&session_id)
            .map(|c| c.value().clone())
            .map(|c| self.view(&c))
    }

    /// Countdowns currently running or paused.
    pub fn live_count(&self) -> usize {
        let now = self.clock.now();
        self.countdowns
            .iter()
            .filter(|c| !c.value().lock().poll(now).is_terminal())
            .count()
    }

    /// Abort every polling task.
    pub fn shutdown(&self) {
        for task in self.tasks.iter() {
            task.value().abort();
        }
        self.tasks.clear();
    }
}

impl Drop for SessionScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
