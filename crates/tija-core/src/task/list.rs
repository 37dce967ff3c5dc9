//! In-memory task collection.
//!
//! Operations on unknown ids report `false`/`None` rather than failing; the
//! list is a cache of whatever the persistence layer last returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, Task};

/// Partial update for a task. `None` leaves a field untouched; for the
/// clearable fields `Some(None)` removes the value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub estimated_minutes: Option<Option<u32>>,
    pub completed: Option<bool>,
    pub categories: Option<Vec<String>>,
}

impl TaskUpdate {
    /// Apply to `task`. A blank title is ignored so the title invariant holds.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                task.title = trimmed.to_string();
            }
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(estimate) = self.estimated_minutes {
            task.estimated_minutes = estimate;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(categories) = self.categories {
            task.categories = categories.into_iter().collect();
        }
    }
}

/// Ordered task collection, insertion order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks not yet completed, in insertion order.
    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Mark a task completed. Returns `false` if the id is unknown.
    pub fn complete(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = true;
                true
            }
            None => false,
        }
    }

    /// Remove a task, returning it if present.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Apply a partial update. Returns the updated task if the id is known.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        update.apply(task);
        Some(task)
    }

    /// Replace the whole collection (e.g. after loading from storage).
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }
}
