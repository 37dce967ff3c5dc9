use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::{FocusSession, TrackerStatus};

/// Every accepted tracker transition produces an Event.
/// The CLI prints them; persistence reacts to `SessionCompleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        task_id: Option<String>,
        planned_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        session_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        session_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionTicked {
        session_id: String,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Session finalized and appended to history.
    SessionCompleted {
        session: FocusSession,
        total_focus_secs: u64,
        at: DateTime<Utc>,
    },
    /// Session dropped by reset; never recorded.
    SessionDiscarded {
        session_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    FocusDurationChanged {
        focus_duration_secs: u64,
        at: DateTime<Utc>,
    },
    CurrentTaskChanged {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TrackerStatus,
        session_id: Option<String>,
        task_id: Option<String>,
        planned_secs: u64,
        elapsed_secs: u64,
        remaining_secs: u64,
        progress_pct: f64,
        total_focus_secs: u64,
        completed_sessions: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The finalized session, if this event completed one.
    pub fn completed_session(&self) -> Option<&FocusSession> {
        match self {
            Event::SessionCompleted { session, .. } => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::SessionPaused {
            session_id: "s1".into(),
            elapsed_secs: 12,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SessionPaused");
        assert_eq!(json["elapsed_secs"], 12);
        assert!(event.completed_session().is_none());
    }
}
