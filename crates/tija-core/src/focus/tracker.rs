//! Focus session state machine.
//!
//! The tracker owns at most one open session. It does not keep time itself:
//! the caller drives it with `tick(elapsed)` from its own one-second timer
//! and decides when to call `complete()` (see [`FocusSessionTracker::is_due`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused
//!                 Running <--resume-- Paused
//! (Running | Paused) --complete--> Idle   (session recorded)
//! (Running | Paused) --reset-----> Idle   (session discarded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut tracker = FocusSessionTracker::new();
//! tracker.set_focus_duration(15)?;
//! tracker.start()?;
//! // Every second:
//! tracker.tick(elapsed_secs)?;
//! if tracker.is_due() {
//!     tracker.complete();
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::session::FocusSession;
use crate::error::TrackerError;
use crate::events::Event;

/// Default focus duration: 25 minutes.
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    /// No open session
    Idle,
    /// Open session, ticking
    Running,
    /// Open session, not ticking
    Paused,
}

impl fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackerStatus::Idle => "idle",
            TrackerStatus::Running => "running",
            TrackerStatus::Paused => "paused",
        })
    }
}

/// Everything the tracker knows, in a serializable form.
///
/// Read it through the accessors; all mutation goes through
/// [`FocusSessionTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    current_session: Option<FocusSession>,
    #[serde(default)]
    current_task: Option<String>,
    #[serde(default = "default_focus_secs")]
    focus_duration_setting: u64,
    #[serde(default)]
    elapsed_time: u64,
    #[serde(default)]
    total_focus_time: u64,
    #[serde(default)]
    history: Vec<FocusSession>,
}

fn default_focus_secs() -> u64 {
    DEFAULT_FOCUS_SECS
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::with_focus_duration(DEFAULT_FOCUS_SECS)
    }
}

impl TrackerState {
    /// Fresh state with the given focus duration in seconds. Zero falls
    /// back to [`DEFAULT_FOCUS_SECS`].
    pub fn with_focus_duration(focus_duration_secs: u64) -> Self {
        let focus_duration_setting = if focus_duration_secs == 0 {
            DEFAULT_FOCUS_SECS
        } else {
            focus_duration_secs
        };
        Self {
            is_active: false,
            current_session: None,
            current_task: None,
            focus_duration_setting,
            elapsed_time: 0,
            total_focus_time: 0,
            history: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn current_session(&self) -> Option<&FocusSession> {
        self.current_session.as_ref()
    }

    pub fn current_task(&self) -> Option<&str> {
        self.current_task.as_deref()
    }

    /// Planned seconds for the next session.
    pub fn focus_duration_setting(&self) -> u64 {
        self.focus_duration_setting
    }

    pub fn elapsed_time(&self) -> u64 {
        self.elapsed_time
    }

    pub fn total_focus_time(&self) -> u64 {
        self.total_focus_time
    }

    /// Completed sessions in completion order.
    pub fn history(&self) -> &[FocusSession] {
        &self.history
    }

    pub fn status(&self) -> TrackerStatus {
        match (&self.current_session, self.is_active) {
            (None, _) => TrackerStatus::Idle,
            (Some(_), true) => TrackerStatus::Running,
            (Some(_), false) => TrackerStatus::Paused,
        }
    }

    /// Copy of the state with an empty history, for storage next to a
    /// sessions table that already holds the finished sessions.
    pub(crate) fn without_history(&self) -> Self {
        Self {
            history: Vec::new(),
            ..self.clone()
        }
    }

    pub(crate) fn replace_history(&mut self, history: Vec<FocusSession>) {
        self.history = history;
    }
}

/// Single-writer focus session tracker.
#[derive(Debug, Clone)]
pub struct FocusSessionTracker<C: Clock = SystemClock> {
    state: TrackerState,
    clock: C,
}

impl FocusSessionTracker<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(TrackerState::default(), SystemClock)
    }

    /// Resume from previously persisted state.
    pub fn from_state(state: TrackerState) -> Self {
        Self::with_clock(state, SystemClock)
    }
}

impl Default for FocusSessionTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FocusSessionTracker<C> {
    pub fn with_clock(state: TrackerState, clock: C) -> Self {
        Self { state, clock }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn into_state(self) -> TrackerState {
        self.state
    }

    pub fn status(&self) -> TrackerStatus {
        self.state.status()
    }

    pub fn current_session(&self) -> Option<&FocusSession> {
        self.state.current_session()
    }

    pub fn history(&self) -> &[FocusSession] {
        self.state.history()
    }

    pub fn total_focus_time(&self) -> u64 {
        self.state.total_focus_time
    }

    pub fn elapsed_time(&self) -> u64 {
        self.state.elapsed_time
    }

    /// Seconds left in the open session, or the full setting when idle.
    pub fn remaining_secs(&self) -> u64 {
        self.state
            .current_session
            .as_ref()
            .map(FocusSession::remaining)
            .unwrap_or(self.state.focus_duration_setting)
    }

    /// 0.0 .. 1.0 progress of the open session (0.0 when idle).
    pub fn progress(&self) -> f64 {
        self.state
            .current_session
            .as_ref()
            .map(FocusSession::progress)
            .unwrap_or(0.0)
    }

    /// Whether the open session has reached its planned duration.
    ///
    /// The tracker never completes a session on its own; callers poll this
    /// after `tick` and decide.
    pub fn is_due(&self) -> bool {
        self.state
            .current_session
            .as_ref()
            .is_some_and(|s| s.actual >= s.planned)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let session = self.state.current_session.as_ref();
        Event::StateSnapshot {
            state: self.status(),
            session_id: session.map(|s| s.id.clone()),
            task_id: session
                .and_then(|s| s.task_id.clone())
                .or_else(|| self.state.current_task.clone()),
            planned_secs: session
                .map(|s| s.planned)
                .unwrap_or(self.state.focus_duration_setting),
            elapsed_secs: self.state.elapsed_time,
            remaining_secs: self.remaining_secs(),
            progress_pct: self.progress() * 100.0,
            total_focus_secs: self.state.total_focus_time,
            completed_sessions: self.state.history.len(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Open a new session using the current duration setting and task.
    ///
    /// Rejected while a session is already open; the open session is left
    /// untouched.
    pub fn start(&mut self) -> Result<Event, TrackerError> {
        if let Some(open) = &self.state.current_session {
            return Err(self.reject(TrackerError::SessionAlreadyOpen {
                session_id: open.id.clone(),
            }));
        }
        let now = self.clock.now();
        let session = FocusSession::open(
            Uuid::new_v4().to_string(),
            now,
            self.state.current_task.clone(),
            self.state.focus_duration_setting,
        );
        debug!(session_id = %session.id, planned = session.planned, "focus session started");
        let event = Event::SessionStarted {
            session_id: session.id.clone(),
            task_id: session.task_id.clone(),
            planned_secs: session.planned,
            at: now,
        };
        self.state.current_session = Some(session);
        self.state.is_active = true;
        self.state.elapsed_time = 0;
        Ok(event)
    }

    pub fn pause(&mut self) -> Result<Event, TrackerError> {
        let session_id = self.open_session_in(TrackerStatus::Running, "pause")?;
        self.state.is_active = false;
        debug!(%session_id, "focus session paused");
        Ok(Event::SessionPaused {
            session_id,
            elapsed_secs: self.state.elapsed_time,
            at: self.clock.now(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, TrackerError> {
        let session_id = self.open_session_in(TrackerStatus::Paused, "resume")?;
        self.state.is_active = true;
        debug!(%session_id, "focus session resumed");
        Ok(Event::SessionResumed {
            session_id,
            elapsed_secs: self.state.elapsed_time,
            at: self.clock.now(),
        })
    }

    /// Start when idle, otherwise flip between running and paused.
    pub fn toggle(&mut self) -> Result<Event, TrackerError> {
        match self.status() {
            TrackerStatus::Idle => self.start(),
            TrackerStatus::Running => self.pause(),
            TrackerStatus::Paused => self.resume(),
        }
    }

    /// Record the elapsed seconds reported by the external timer.
    pub fn tick(&mut self, elapsed_secs: u64) -> Result<Event, TrackerError> {
        let session_id = self.open_session_in(TrackerStatus::Running, "tick")?;
        let current = self.state.elapsed_time;
        if elapsed_secs < current {
            return Err(self.reject(TrackerError::ElapsedRegressed {
                current,
                given: elapsed_secs,
            }));
        }
        let remaining_secs = match self.state.current_session.as_mut() {
            Some(session) => {
                session.actual = elapsed_secs;
                session.remaining()
            }
            None => 0,
        };
        self.state.elapsed_time = elapsed_secs;
        Ok(Event::SessionTicked {
            session_id,
            elapsed_secs,
            remaining_secs,
            at: self.clock.now(),
        })
    }

    /// Finalize the open session and append it to history.
    ///
    /// Returns `None` (and changes nothing) when no session is open, so
    /// duplicate completion signals are harmless.
    pub fn complete(&mut self) -> Option<Event> {
        let mut session = self.state.current_session.take()?;
        let now = self.clock.now();
        session.finalize(now);
        self.state.total_focus_time = self.state.total_focus_time.saturating_add(session.actual);
        self.state.is_active = false;
        self.state.elapsed_time = 0;
        info!(
            session_id = %session.id,
            actual = session.actual,
            planned = session.planned,
            "focus session completed"
        );
        self.state.history.push(session.clone());
        Some(Event::SessionCompleted {
            session,
            total_focus_secs: self.state.total_focus_time,
            at: now,
        })
    }

    /// Discard the open session without recording it.
    ///
    /// Returns `None` when no session is open.
    pub fn reset(&mut self) -> Option<Event> {
        let session = self.state.current_session.take()?;
        self.state.is_active = false;
        self.state.elapsed_time = 0;
        debug!(session_id = %session.id, actual = session.actual, "focus session discarded");
        Some(Event::SessionDiscarded {
            session_id: session.id,
            elapsed_secs: session.actual,
            at: self.clock.now(),
        })
    }

    /// Set the planned duration for the next session. An open session keeps
    /// the duration it started with.
    pub fn set_focus_duration(&mut self, minutes: u32) -> Result<Event, TrackerError> {
        if minutes == 0 {
            return Err(self.reject(TrackerError::InvalidDuration));
        }
        self.state.focus_duration_setting = u64::from(minutes) * 60;
        Ok(Event::FocusDurationChanged {
            focus_duration_secs: self.state.focus_duration_setting,
            at: self.clock.now(),
        })
    }

    /// Choose the task for the next session. Rejected while a session is
    /// open: an in-progress session is never retagged.
    pub fn set_current_task(&mut self, task_id: Option<String>) -> Result<Event, TrackerError> {
        if let Some(open) = &self.state.current_session {
            return Err(self.reject(TrackerError::SessionInProgress {
                session_id: open.id.clone(),
            }));
        }
        self.state.current_task = task_id;
        Ok(Event::CurrentTaskChanged {
            task_id: self.state.current_task.clone(),
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn open_session_in(
        &self,
        expected: TrackerStatus,
        event: &'static str,
    ) -> Result<String, TrackerError> {
        let from = self.status();
        match &self.state.current_session {
            Some(session) if from == expected => Ok(session.id.clone()),
            _ => Err(self.reject(TrackerError::InvalidTransition { from, event })),
        }
    }

    fn reject(&self, err: TrackerError) -> TrackerError {
        warn!(state = %self.status(), error = %err, "focus tracker rejected event");
        err
    }
}
