//! # Tija Core Library
//!
//! Core logic for a personal productivity assistant: tasks ranked by
//! urgency and importance, a focus-session tracker, productivity statistics
//! and optional coaching text from a completion API. Every operation is
//! exposed through the standalone `tija-cli` binary.
//!
//! ## Architecture
//!
//! - **Priority**: pure scoring and stable ranking of tasks against a
//!   reference time
//! - **Focus**: a state machine (`Idle`/`Running`/`Paused`) owning the open
//!   session and the append-only history; time is reported by the caller
//! - **Storage**: SQLite for tasks, sessions and tracker state, TOML for
//!   configuration
//! - **Insights**: single-attempt requests with a static fallback report
//!
//! ## Key Components
//!
//! - [`PriorityEngine`]: scoring and ranking
//! - [`FocusSessionTracker`]: focus timer state machine
//! - [`Database`]: persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod focus;
pub mod insights;
pub mod priority;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, DatabaseError, InsightError, TrackerError, ValidationError};
pub use events::Event;
pub use focus::{FocusSession, FocusSessionTracker, SharedTracker, TrackerState, TrackerStatus};
pub use insights::{InsightClient, InsightSnapshot, Insights};
pub use priority::{PriorityEngine, ScoreBreakdown};
pub use storage::{Config, Database};
pub use task::{Priority, Task, TaskList, TaskUpdate};
