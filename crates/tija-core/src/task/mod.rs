//! Task types and the in-memory task list.
//!
//! Optional task fields are parsed leniently: a malformed due date, an
//! unknown priority label or a negative estimate deserialize as "absent"
//! instead of failing the whole record. Ranking relies on this, since it has
//! no error channel of its own.

mod list;

pub use list::{TaskList, TaskUpdate};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Declared task priority.
///
/// A task without a priority is its own "unspecified" tier, represented as
/// `Option::<Priority>::None` on [`Task`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive parse; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::parse(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "priority".into(),
            message: format!("expected high, medium or low, got '{s}'"),
        })
    }
}

/// A user-defined unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, immutable once created
    pub id: String,
    /// Display title (non-empty)
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Declared priority; `None` is the unspecified tier
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    /// Deadline; `None` means no deadline pressure
    #[serde(default, alias = "dueDate", deserialize_with = "lenient_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    /// Estimated duration in minutes
    #[serde(
        default,
        alias = "estimatedMinutes",
        deserialize_with = "lenient_minutes"
    )]
    pub estimated_minutes: Option<u32>,
    /// Whether the task is completed
    #[serde(default)]
    pub completed: bool,
    /// Free-text labels, order irrelevant
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Creation timestamp
    #[serde(default = "Utc::now", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh UUID.
    ///
    /// # Errors
    /// Returns [`ValidationError::Empty`] if `title` is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("title".into()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: trimmed.to_string(),
            description: None,
            priority: None,
            due_date: None,
            estimated_minutes: None,
            completed: false,
            categories: BTreeSet::new(),
            created_at: Utc::now(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parse a due date in RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or `YYYY-MM-DD`
/// (midnight UTC) form.
pub fn parse_due_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ── Lenient field decoding ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum Loose {
    Int(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Priority>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Text(s)) => Priority::parse(&s),
        _ => None,
    })
}

fn lenient_due_date<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Text(s)) => parse_due_date(&s),
        _ => None,
    })
}

fn lenient_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Int(n)) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        Some(Loose::Float(f)) if f.is_finite() && f >= 0.0 => Some(f.round() as u32),
        Some(Loose::Text(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_rejects_blank_title() {
        assert_eq!(
            Task::new("   ").unwrap_err(),
            ValidationError::Empty("title".into())
        );
        assert_eq!(Task::new("  Write report ").unwrap().title, "Write report");
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" Medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn parse_due_date_accepts_common_forms() {
        let midnight = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2026-03-01"), Some(midnight));
        assert_eq!(parse_due_date("2026-03-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_due_date("2026-03-01T00:00:00"), Some(midnight));
        assert_eq!(
            parse_due_date("2026-03-01T09:00:00+09:00"),
            Some(midnight)
        );
        assert_eq!(parse_due_date("next tuesday"), None);
    }

    #[test]
    fn malformed_optional_fields_degrade_to_absent() {
        let json = r#"{
            "id": "t1",
            "title": "Broken",
            "priority": "urgent",
            "dueDate": "not a date",
            "estimatedMinutes": -5
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, None);
        assert_eq!(task.due_date, None);
        assert_eq!(task.estimated_minutes, None);
        assert!(!task.completed);
    }

    #[test]
    fn camel_case_record_is_accepted() {
        let json = r#"{
            "id": "t2",
            "title": "Ship",
            "priority": "High",
            "dueDate": "2026-03-01",
            "estimatedMinutes": 10,
            "categories": ["work", "work", "ops"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.estimated_minutes, Some(10));
        assert_eq!(task.categories.len(), 2);
        assert!(task.due_date.is_some());
    }

    #[test]
    fn serialized_task_reads_back_identically() {
        let task = Task::new("Plan sprint")
            .unwrap()
            .with_priority(Priority::Low)
            .with_due_date(Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap())
            .with_estimate(45)
            .with_category("work");
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
