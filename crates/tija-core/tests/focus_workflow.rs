//! Integration tests: focus tracker driven across process restarts via the
//! database, and statistics over the recorded sessions.

use chrono::{Duration, TimeZone, Utc};
use tija_core::focus::ManualClock;
use tija_core::stats::{most_productive_hour, productive_time};
use tija_core::{
    Database, Event, FocusSessionTracker, Task, TrackerError, TrackerState, TrackerStatus,
};

#[test]
fn test_session_survives_restart_and_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tija.db");
    let start = Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap();
    let clock = ManualClock::new(start);

    let task = Task::new("Draft proposal").unwrap();
    {
        let db = Database::open_at(&db_path).unwrap();
        db.create_task(&task).unwrap();

        let mut tracker = FocusSessionTracker::with_clock(TrackerState::default(), clock.clone());
        tracker.set_current_task(Some(task.id.clone())).unwrap();
        tracker.start().unwrap();
        tracker.tick(600).unwrap();
        db.save_tracker_state(tracker.state()).unwrap();
    }

    // Second "process": pick up where the first left off.
    let db = Database::open_at(&db_path).unwrap();
    let state = db.load_tracker_state().unwrap().unwrap();
    let mut tracker = FocusSessionTracker::with_clock(state, clock.clone());
    assert_eq!(tracker.status(), TrackerStatus::Running);
    assert_eq!(tracker.elapsed_time(), 600);

    tracker.tick(1500).unwrap();
    clock.advance(Duration::minutes(25));
    let event = tracker.complete().unwrap();
    let session = event.completed_session().unwrap().clone();
    db.record_session(&session).unwrap();
    db.save_tracker_state(tracker.state()).unwrap();

    assert_eq!(session.task_id.as_deref(), Some(task.id.as_str()));
    assert_eq!(session.actual, 1500);
    assert_eq!(session.end_time, Some(start + Duration::minutes(25)));

    let sessions = db.list_sessions().unwrap();
    assert_eq!(sessions, vec![session]);
    assert_eq!(productive_time(&sessions), 1500);
    assert_eq!(most_productive_hour(&sessions, &Utc), Some(9));

    let restored = db.load_tracker_state().unwrap().unwrap();
    assert_eq!(restored.status(), TrackerStatus::Idle);
    assert_eq!(restored.total_focus_time(), 1500);
    assert_eq!(restored.history().len(), 1);
}

#[test]
fn test_rejected_events_leave_persisted_state_alone() {
    let db = Database::open_memory().unwrap();
    let mut tracker = FocusSessionTracker::new();
    tracker.start().unwrap();
    tracker.tick(300).unwrap();
    db.save_tracker_state(tracker.state()).unwrap();

    let before = tracker.state().clone();
    assert!(matches!(
        tracker.tick(100),
        Err(TrackerError::ElapsedRegressed { current: 300, given: 100 })
    ));
    assert!(matches!(
        tracker.resume(),
        Err(TrackerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        tracker.set_current_task(Some("other".into())),
        Err(TrackerError::SessionInProgress { .. })
    ));
    assert_eq!(tracker.state(), &before);
    assert_eq!(db.load_tracker_state().unwrap().as_ref(), Some(&before));
}

#[test]
fn test_reset_discards_without_history() {
    let mut tracker = FocusSessionTracker::new();
    tracker.start().unwrap();
    tracker.tick(42).unwrap();
    tracker.pause().unwrap();

    let event = tracker.reset().unwrap();
    assert!(matches!(event, Event::SessionDiscarded { elapsed_secs: 42, .. }));
    assert!(tracker.history().is_empty());
    assert_eq!(tracker.total_focus_time(), 0);
    assert!(tracker.reset().is_none());
    assert!(tracker.complete().is_none());
}

#[test]
fn test_duration_change_applies_to_next_session_only() {
    let mut tracker = FocusSessionTracker::new();
    tracker.start().unwrap();
    tracker.set_focus_duration(50).unwrap();
    assert_eq!(tracker.current_session().unwrap().planned, 1500);

    tracker.complete().unwrap();
    tracker.start().unwrap();
    assert_eq!(tracker.current_session().unwrap().planned, 3000);
}
