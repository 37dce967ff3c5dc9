use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use tija_core::stats::{
    completion_rates, format_duration, format_hour, hourly_summaries, most_productive_hour,
    productive_time, weekly_focus_minutes, CompletionRates,
};
use tija_core::Database;

use super::print_json;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, completion rates and the most productive hour
    Summary,
    /// Focus totals per hour of day
    Hourly,
    /// Focus minutes per weekday
    Weekly,
}

#[derive(Serialize)]
struct Summary {
    completed_sessions: usize,
    productive_secs: u64,
    productive_time: String,
    most_productive_hour: Option<u32>,
    most_productive_hour_label: Option<String>,
    completion: CompletionRates,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.list_sessions()?;

    match action {
        StatsAction::Summary => {
            let tasks = db.list_tasks(true)?;
            let secs = productive_time(&sessions);
            let hour = most_productive_hour(&sessions, &Local);
            print_json(&Summary {
                completed_sessions: sessions.iter().filter(|s| s.completed).count(),
                productive_secs: secs,
                productive_time: format_duration(secs),
                most_productive_hour: hour,
                most_productive_hour_label: hour.map(format_hour),
                completion: completion_rates(&tasks),
            })?;
        }
        StatsAction::Hourly => print_json(&hourly_summaries(&sessions, &Local))?,
        StatsAction::Weekly => print_json(&weekly_focus_minutes(&sessions, &Local))?,
    }
    Ok(())
}
