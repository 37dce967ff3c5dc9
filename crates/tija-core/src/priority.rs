//! Task priority scoring and ranking.
//!
//! Scores are additive over three independent factors and are only
//! meaningful relative to each other:
//! - Due-date urgency (closer = higher, none = 0)
//! - Declared priority (unspecified sits between medium and low)
//! - Estimated duration (shorter tasks get a quick-win bonus)
//!
//! Ranking is a stable descending sort on the score, so tasks with equal
//! scores keep their input order and displayed lists do not jitter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// Per-factor contributions to a task's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub due: i64,
    pub priority: i64,
    pub estimate: i64,
    pub total: i64,
}

/// Scores and ranks tasks against a fixed reference time.
#[derive(Debug, Clone, Copy)]
pub struct PriorityEngine {
    reference_time: DateTime<Utc>,
}

impl PriorityEngine {
    /// Engine anchored at the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Engine anchored at `reference_time` (deterministic under test).
    pub fn at(reference_time: DateTime<Utc>) -> Self {
        Self { reference_time }
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Total score for a task.
    pub fn score(&self, task: &Task) -> i64 {
        self.score_breakdown(task).total
    }

    pub fn score_breakdown(&self, task: &Task) -> ScoreBreakdown {
        let due = task
            .due_date
            .map(|due| due_score(days_until_due(due, self.reference_time)))
            .unwrap_or(0);
        let priority = priority_score(task.priority);
        let estimate = task.estimated_minutes.map(estimate_score).unwrap_or(0);
        ScoreBreakdown {
            due,
            priority,
            estimate,
            total: due + priority + estimate,
        }
    }

    /// Return every task exactly once, highest score first.
    ///
    /// Equal scores keep their relative input order. The input is not
    /// modified.
    pub fn rank(&self, tasks: &[Task]) -> Vec<Task> {
        self.rank_refs(tasks).into_iter().cloned().collect()
    }

    /// Borrowing variant of [`rank`](Self::rank).
    pub fn rank_refs<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut scored: Vec<(i64, &'a Task)> =
            tasks.into_iter().map(|t| (self.score(t), t)).collect();
        // `sort_by` is stable; ties stay in input order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, t)| t).collect()
    }
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole days until `due`, rounded up, with past-due clamped to 0.
///
/// Counting uses exact elapsed UTC time rather than local calendar
/// midnights, so the result does not depend on the device timezone.
pub fn days_until_due(due: DateTime<Utc>, reference_time: DateTime<Utc>) -> i64 {
    let delta = due.signed_duration_since(reference_time);
    if delta <= Duration::zero() {
        return 0;
    }
    let whole = delta.num_days();
    if delta > Duration::days(whole) {
        whole + 1
    } else {
        whole
    }
}

fn due_score(days: i64) -> i64 {
    match days {
        d if d <= 1 => 50,
        2..=3 => 30,
        4..=7 => 20,
        _ => 10,
    }
}

fn priority_score(priority: Option<Priority>) -> i64 {
    match priority {
        Some(Priority::High) => 30,
        Some(Priority::Medium) => 20,
        Some(Priority::Low) => 10,
        None => 15,
    }
}

fn estimate_score(minutes: u32) -> i64 {
    if minutes <= 15 {
        15 // Quick win
    } else if minutes <= 30 {
        10
    } else {
        5
    }
}

/// Convenience: score one task at `reference_time`.
pub fn score(task: &Task, reference_time: DateTime<Utc>) -> i64 {
    PriorityEngine::at(reference_time).score(task)
}

/// Convenience: rank tasks at `reference_time`.
pub fn rank(tasks: &[Task], reference_time: DateTime<Utc>) -> Vec<Task> {
    PriorityEngine::at(reference_time).rank(tasks)
}

/// Convenience: rank tasks against the current time.
pub fn rank_now(tasks: &[Task]) -> Vec<Task> {
    PriorityEngine::new().rank(tasks)
}
