//! Task management commands for CLI.

use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use tija_core::stats::group_tasks_by_date;
use tija_core::task::parse_due_date;
use tija_core::{Database, Priority, PriorityEngine, ScoreBreakdown, Task, TaskUpdate};

use super::print_json;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// high, medium or low
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
        /// Estimated minutes
        #[arg(long)]
        estimate: Option<u32>,
        /// Category label (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// List tasks, highest priority score first
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Show the score breakdown for each task
        #[arg(long)]
        explain: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long, conflicts_with = "clear_priority")]
        priority: Option<Priority>,
        /// Remove the priority
        #[arg(long)]
        clear_priority: bool,
        /// New due date
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// New estimate in minutes
        #[arg(long)]
        estimate: Option<u32>,
        /// Replace categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Group tasks by due date
    Group {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
}

#[derive(Serialize)]
struct RankedTask<'a> {
    #[serde(flatten)]
    task: &'a Task,
    score: ScoreBreakdown,
}

fn parse_due(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, Box<dyn std::error::Error>> {
    parse_due_date(raw).ok_or_else(|| format!("invalid due date: {raw}").into())
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Add {
            title,
            priority,
            due,
            estimate,
            categories,
            description,
        } => {
            let mut task = Task::new(title)?;
            task.priority = priority;
            task.due_date = due.as_deref().map(parse_due).transpose()?;
            task.estimated_minutes = estimate;
            task.description = description;
            task.categories = categories.into_iter().collect();
            db.create_task(&task)?;
            print_json(&task)?;
        }
        TaskAction::List { all, explain } => {
            let tasks = db.list_tasks(all)?;
            let engine = PriorityEngine::new();
            let ranked = engine.rank_refs(&tasks);
            if explain {
                let rows: Vec<_> = ranked
                    .into_iter()
                    .map(|task| RankedTask {
                        task,
                        score: engine.score_breakdown(task),
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                print_json(&ranked)?;
            }
        }
        TaskAction::Get { id } => {
            let task = db.get_task(&id)?.ok_or(format!("task not found: {id}"))?;
            print_json(&task)?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            clear_priority,
            due,
            clear_due,
            estimate,
            categories,
        } => {
            let update = TaskUpdate {
                title,
                description: description.map(Some),
                priority: if clear_priority { Some(None) } else { priority.map(Some) },
                due_date: if clear_due {
                    Some(None)
                } else {
                    due.as_deref().map(parse_due).transpose()?.map(Some)
                },
                estimated_minutes: estimate.map(Some),
                completed: None,
                categories: (!categories.is_empty()).then_some(categories),
            };
            let task = db
                .update_task(&id, update)?
                .ok_or(format!("task not found: {id}"))?;
            print_json(&task)?;
        }
        TaskAction::Complete { id } => {
            if !db.complete_task(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            print_json(&serde_json::json!({ "type": "task_completed", "id": id }))?;
        }
        TaskAction::Delete { id } => {
            if !db.delete_task(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            print_json(&serde_json::json!({ "type": "task_deleted", "id": id }))?;
        }
        TaskAction::Group { all } => {
            let tasks = db.list_tasks(all)?;
            print_json(&group_tasks_by_date(&tasks, &Local))?;
        }
    }
    Ok(())
}
