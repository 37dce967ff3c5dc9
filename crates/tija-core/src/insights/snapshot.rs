use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::FocusSession;
use crate::stats::{completion_rates, format_duration, productive_time, CompletionRates};
use crate::task::{Priority, Task};

/// Everything sent to the completion API, in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSnapshot {
    pub name: String,
    pub tasks: Vec<Task>,
    pub focus_sessions: Vec<FocusSession>,
    pub completion_rates: CompletionRates,
    pub recent_achievements: Vec<String>,
    pub current_challenges: Vec<String>,
}

impl InsightSnapshot {
    /// Build a snapshot, deriving completion rates, achievements and
    /// challenges from the data as of `now`.
    pub fn new(
        name: impl Into<String>,
        tasks: Vec<Task>,
        focus_sessions: Vec<FocusSession>,
        now: DateTime<Utc>,
    ) -> Self {
        let completion_rates = completion_rates(&tasks);
        let recent_achievements = achievements(&tasks, &focus_sessions);
        let current_challenges = challenges(&tasks, now);
        Self {
            name: name.into(),
            tasks,
            focus_sessions,
            completion_rates,
            recent_achievements,
            current_challenges,
        }
    }
}

fn achievements(tasks: &[Task], sessions: &[FocusSession]) -> Vec<String> {
    let mut out = Vec::new();
    let done = tasks.iter().filter(|t| t.completed).count();
    if done > 0 {
        out.push(format!("Completed {done} tasks"));
    }
    let completed_sessions = sessions.iter().filter(|s| s.completed).count();
    if completed_sessions > 0 {
        out.push(format!(
            "Finished {completed_sessions} focus sessions ({} total)",
            format_duration(productive_time(sessions))
        ));
    }
    out
}

fn challenges(tasks: &[Task], now: DateTime<Utc>) -> Vec<String> {
    let soon = now + Duration::days(3);
    let urgent = tasks
        .iter()
        .filter(|t| !t.completed && t.priority == Some(Priority::High))
        .filter(|t| t.due_date.is_some_and(|d| d <= soon))
        .count();
    let mut out = Vec::new();
    if urgent > 0 {
        out.push(format!("Has {urgent} high-priority tasks due soon"));
    }
    let overdue = tasks
        .iter()
        .filter(|t| !t.completed && t.due_date.is_some_and(|d| d < now))
        .count();
    if overdue > 0 {
        out.push(format!("Has {overdue} overdue tasks"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derives_achievements_and_challenges() {
        let now = Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap();
        let mut done = Task::new("done").unwrap();
        done.completed = true;
        let urgent = Task::new("urgent")
            .unwrap()
            .with_priority(Priority::High)
            .with_due_date(now + Duration::days(1));
        let late = Task::new("late").unwrap().with_due_date(now - Duration::days(1));
        let session = FocusSession {
            id: "s".into(),
            start_time: now,
            end_time: Some(now),
            task_id: None,
            planned: 1500,
            actual: 1500,
            completed: true,
        };

        let snap = InsightSnapshot::new("Ana", vec![done, urgent, late], vec![session], now);
        assert_eq!(snap.completion_rates.completed, 1);
        assert_eq!(
            snap.recent_achievements,
            vec!["Completed 1 tasks", "Finished 1 focus sessions (25m total)"]
        );
        assert_eq!(
            snap.current_challenges,
            vec!["Has 1 high-priority tasks due soon", "Has 1 overdue tasks"]
        );
    }
}
