use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timed work interval associated with zero or one task.
///
/// Only [`FocusSessionTracker`](super::FocusSessionTracker) creates and
/// mutates sessions. Once completed a session is an immutable history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Unique identifier assigned at start
    pub id: String,
    /// When the session was started
    #[serde(alias = "startTime")]
    pub start_time: DateTime<Utc>,
    /// When the session was completed (None while open)
    #[serde(default, alias = "endTime")]
    pub end_time: Option<DateTime<Utc>>,
    /// Weak reference to a task; the session outlives task deletion
    #[serde(default, alias = "taskId")]
    pub task_id: Option<String>,
    /// Target duration in seconds, fixed at start
    pub planned: u64,
    /// Elapsed seconds, never decreases while open
    #[serde(default)]
    pub actual: u64,
    /// False while open, true once finalized
    #[serde(default)]
    pub completed: bool,
}

impl FocusSession {
    pub(crate) fn open(
        id: String,
        start_time: DateTime<Utc>,
        task_id: Option<String>,
        planned: u64,
    ) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            task_id,
            planned,
            actual: 0,
            completed: false,
        }
    }

    /// Seconds left until `planned` is reached.
    pub fn remaining(&self) -> u64 {
        self.planned.saturating_sub(self.actual)
    }

    /// 0.0 .. 1.0 progress towards `planned`.
    pub fn progress(&self) -> f64 {
        if self.planned == 0 {
            return 0.0;
        }
        (self.actual as f64 / self.planned as f64).min(1.0)
    }

    pub(crate) fn finalize(&mut self, end_time: DateTime<Utc>) {
        self.completed = true;
        self.end_time = Some(end_time);
    }
}
