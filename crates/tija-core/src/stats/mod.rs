//! Statistics for TIJA
//!
//! Reductions over completed focus sessions (productive time, hourly and
//! weekday summaries) and over tasks (completion rates, due-date grouping),
//! plus the display formatters the CLI uses for them.

mod completion;
mod format;
mod productivity;

pub use completion::{completion_rates, group_tasks_by_date, CompletionRates, NO_DATE};
pub use format::{format_clock, format_duration, format_hour};
pub use productivity::{
    hourly_summaries, most_productive_hour, productive_time, weekly_focus_minutes, DayFocus,
    HourlySummary,
};
