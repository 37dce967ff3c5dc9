use std::collections::BTreeMap;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Bucket key for tasks without a due date.
pub const NO_DATE: &str = "No Date";

/// Task completion percentages, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionRates {
    pub total: usize,
    pub completed: usize,
    /// `None` when there are no tasks
    pub overall: Option<f64>,
    /// Per category label, only for labels that appear on some task
    pub by_category: BTreeMap<String, f64>,
}

fn pct(part: usize, whole: usize) -> f64 {
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

pub fn completion_rates(tasks: &[Task]) -> CompletionRates {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    let mut per_category: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for task in tasks {
        for category in &task.categories {
            let entry = per_category.entry(category.as_str()).or_default();
            entry.0 += 1;
            if task.completed {
                entry.1 += 1;
            }
        }
    }

    CompletionRates {
        total,
        completed,
        overall: (total > 0).then(|| pct(completed, total)),
        by_category: per_category
            .into_iter()
            .map(|(name, (all, done))| (name.to_string(), pct(done, all)))
            .collect(),
    }
}

/// Group tasks by due date (`YYYY-MM-DD` in `tz`), keeping input order inside
/// each group. Tasks without a due date go under [`NO_DATE`].
pub fn group_tasks_by_date<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    tz: &Tz,
) -> BTreeMap<String, Vec<&'a Task>> {
    let mut groups: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        let key = match task.due_date {
            Some(due) => due.with_timezone(tz).date_naive().to_string(),
            None => NO_DATE.to_string(),
        };
        groups.entry(key).or_default().push(task);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::parse_due_date;
    use chrono::Utc;

    #[test]
    fn rates_overall_and_by_category() {
        let mut a = Task::new("a").unwrap().with_category("work");
        a.completed = true;
        let b = Task::new("b").unwrap().with_category("work").with_category("home");
        let c = Task::new("c").unwrap();
        let rates = completion_rates(&[a, b, c]);

        assert_eq!(rates.total, 3);
        assert_eq!(rates.completed, 1);
        assert_eq!(rates.overall, Some(33.33));
        assert_eq!(rates.by_category.get("work"), Some(&50.0));
        assert_eq!(rates.by_category.get("home"), Some(&0.0));
    }

    #[test]
    fn rates_for_no_tasks() {
        let rates = completion_rates(&[]);
        assert_eq!(rates.overall, None);
        assert!(rates.by_category.is_empty());
    }

    #[test]
    fn grouping_by_due_date() {
        let tasks = vec![
            Task::new("a").unwrap().with_due_date(parse_due_date("2026-03-02").unwrap()),
            Task::new("b").unwrap(),
            Task::new("c").unwrap().with_due_date(parse_due_date("2026-03-02T18:00:00Z").unwrap()),
        ];
        let groups = group_tasks_by_date(&tasks, &Utc);
        assert_eq!(groups.len(), 2);
        let titles: Vec<_> = groups["2026-03-02"].iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert_eq!(groups[NO_DATE].len(), 1);
    }
}
