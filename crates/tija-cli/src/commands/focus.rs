use clap::Subcommand;
use tija_core::{Config, Database, Event, FocusSessionTracker, TrackerState};
use tracing::debug;

use super::print_json;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a focus session
    Start,
    /// Pause the running session
    Pause,
    /// Resume the paused session
    Resume,
    /// Start, pause or resume depending on the current state
    Toggle,
    /// Report elapsed seconds for the running session
    Tick {
        /// Total elapsed seconds since the session started
        elapsed: u64,
    },
    /// Finish the open session and record it
    Complete,
    /// Discard the open session
    Reset,
    /// Print current tracker state as JSON
    Status,
    /// Set the focus duration for the next session
    Duration {
        /// Minutes (at least 1)
        minutes: u32,
    },
    /// Choose the task for the next session; omit the id to clear it
    Task {
        /// Task ID
        id: Option<String>,
    },
}

/// Restore the saved tracker and apply the configured duration to the next
/// session. An open session keeps the duration it started with.
fn load_tracker(db: &Database) -> Result<FocusSessionTracker, Box<dyn std::error::Error>> {
    let configured = Config::load_or_default().focus_duration_secs();
    let state = match db.load_tracker_state()? {
        Some(state) => state,
        None => {
            debug!(secs = configured, "fresh tracker state");
            TrackerState::with_focus_duration(configured)
        }
    };
    let mut tracker = FocusSessionTracker::from_state(state);
    if tracker.state().focus_duration_setting() != configured {
        debug!(
            from = tracker.state().focus_duration_setting(),
            to = configured,
            "focus duration taken from config"
        );
        tracker.set_focus_duration(u32::try_from(configured / 60)?)?;
    }
    Ok(tracker)
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = load_tracker(&db)?;

    let event: Option<Event> = match action {
        FocusAction::Start => Some(tracker.start()?),
        FocusAction::Pause => Some(tracker.pause()?),
        FocusAction::Resume => Some(tracker.resume()?),
        FocusAction::Toggle => Some(tracker.toggle()?),
        FocusAction::Tick { elapsed } => Some(tracker.tick(elapsed)?),
        FocusAction::Complete => tracker.complete(),
        FocusAction::Reset => tracker.reset(),
        FocusAction::Status => None,
        FocusAction::Duration { minutes } => {
            let event = tracker.set_focus_duration(minutes)?;
            let mut config = Config::load()?;
            config.focus.focus_duration = minutes;
            config.save()?;
            Some(event)
        }
        FocusAction::Task { id } => {
            if let Some(id) = &id {
                if db.get_task(id)?.is_none() {
                    return Err(format!("task not found: {id}").into());
                }
            }
            Some(tracker.set_current_task(id)?)
        }
    };

    if let Some(session) = event.as_ref().and_then(Event::completed_session) {
        db.record_session(session)?;
    }
    db.save_tracker_state(tracker.state())?;

    match event {
        Some(event) => print_json(&event)?,
        None => print_json(&tracker.snapshot())?,
    }
    Ok(())
}
