//! Productivity reductions over focus sessions.
//!
//! Only completed sessions count. Hour-of-day and weekday bucketing happen
//! in the caller-supplied timezone.

use chrono::{Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::focus::FocusSession;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Focus totals for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlySummary {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Completed sessions started in this hour
    pub sessions: usize,
    /// Summed `actual` seconds
    pub focus_secs: u64,
}

/// Focus minutes for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFocus {
    pub day: String,
    pub minutes: u64,
}

fn completed(sessions: &[FocusSession]) -> impl Iterator<Item = &FocusSession> {
    sessions.iter().filter(|s| s.completed)
}

/// Total focused seconds over completed sessions.
pub fn productive_time(sessions: &[FocusSession]) -> u64 {
    completed(sessions).map(|s| s.actual).sum()
}

/// Per-hour totals for hours with at least one completed session, ascending.
pub fn hourly_summaries<Tz: TimeZone>(sessions: &[FocusSession], tz: &Tz) -> Vec<HourlySummary> {
    let mut buckets = [(0usize, 0u64); 24];
    for session in completed(sessions) {
        let hour = session.start_time.with_timezone(tz).hour() as usize;
        buckets[hour].0 += 1;
        buckets[hour].1 += session.actual;
    }
    buckets
        .iter()
        .enumerate()
        .filter(|(_, (count, _))| *count > 0)
        .map(|(hour, (count, secs))| HourlySummary {
            hour: hour as u32,
            sessions: *count,
            focus_secs: *secs,
        })
        .collect()
}

/// Hour of day with the most focused time.
///
/// `None` when no completed session has any focused time. Ties go to the
/// earliest hour.
pub fn most_productive_hour<Tz: TimeZone>(sessions: &[FocusSession], tz: &Tz) -> Option<u32> {
    let mut best: Option<(u32, u64)> = None;
    for summary in hourly_summaries(sessions, tz) {
        let beats = match best {
            Some((_, secs)) => summary.focus_secs > secs,
            None => summary.focus_secs > 0,
        };
        if beats {
            best = Some((summary.hour, summary.focus_secs));
        }
    }
    best.map(|(hour, _)| hour)
}

/// Focus minutes per weekday, Sunday first.
pub fn weekly_focus_minutes<Tz: TimeZone>(sessions: &[FocusSession], tz: &Tz) -> Vec<DayFocus> {
    let mut secs = [0u64; 7];
    for session in completed(sessions) {
        let day = session
            .start_time
            .with_timezone(tz)
            .weekday()
            .num_days_from_sunday() as usize;
        secs[day] += session.actual;
    }
    WEEKDAYS
        .iter()
        .zip(secs)
        .map(|(day, s)| DayFocus {
            day: (*day).to_string(),
            minutes: s / 60,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn session(start: &str, actual: u64, completed: bool) -> FocusSession {
        let start_time = DateTime::parse_from_rfc3339(start)
            .unwrap()
            .with_timezone(&Utc);
        FocusSession {
            id: start.to_string(),
            start_time,
            end_time: completed.then_some(start_time),
            task_id: None,
            planned: 1500,
            actual,
            completed,
        }
    }

    #[test]
    fn productive_time_ignores_open_sessions() {
        let sessions = vec![
            session("2026-02-16T09:00:00Z", 1500, true),
            session("2026-02-16T10:00:00Z", 600, false),
            session("2026-02-16T11:00:00Z", 300, true),
        ];
        assert_eq!(productive_time(&sessions), 1800);
        assert_eq!(productive_time(&[]), 0);
    }

    #[test]
    fn hourly_summaries_group_by_start_hour() {
        let sessions = vec![
            session("2026-02-16T09:05:00Z", 1500, true),
            session("2026-02-16T09:40:00Z", 900, true),
            session("2026-02-16T14:00:00Z", 1200, true),
        ];
        let hourly = hourly_summaries(&sessions, &Utc);
        assert_eq!(
            hourly,
            vec![
                HourlySummary { hour: 9, sessions: 2, focus_secs: 2400 },
                HourlySummary { hour: 14, sessions: 1, focus_secs: 1200 },
            ]
        );
    }

    #[test]
    fn most_productive_hour_uses_timezone() {
        let sessions = vec![
            session("2026-02-16T00:30:00Z", 1500, true),
            session("2026-02-16T05:00:00Z", 600, true),
        ];
        assert_eq!(most_productive_hour(&sessions, &Utc), Some(0));
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(most_productive_hour(&sessions, &tokyo), Some(9));
    }

    #[test]
    fn most_productive_hour_ties_and_empty() {
        let tie = vec![
            session("2026-02-16T15:00:00Z", 600, true),
            session("2026-02-16T08:00:00Z", 600, true),
        ];
        assert_eq!(most_productive_hour(&tie, &Utc), Some(8));
        assert_eq!(most_productive_hour(&[], &Utc), None);
        let zero = vec![session("2026-02-16T08:00:00Z", 0, true)];
        assert_eq!(most_productive_hour(&zero, &Utc), None);
    }

    #[test]
    fn weekly_minutes_start_on_sunday() {
        // 2026-02-15 is a Sunday.
        let sessions = vec![
            session("2026-02-15T10:00:00Z", 1500, true),
            session("2026-02-16T10:00:00Z", 3600, true),
            session("2026-02-16T12:00:00Z", 600, false),
        ];
        let week = weekly_focus_minutes(&sessions, &Utc);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], DayFocus { day: "Sun".into(), minutes: 25 });
        assert_eq!(week[1], DayFocus { day: "Mon".into(), minutes: 60 });
        assert_eq!(week[6].minutes, 0);
    }
}
