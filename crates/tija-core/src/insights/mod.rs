//! Coaching insights from a third-party completion API.
//!
//! The failure policy is deliberately simple: one attempt, and on any error
//! (or a reply nothing useful can be extracted from) the static fallback
//! report is returned instead.

mod client;
mod extract;
mod snapshot;

pub use client::{FocusTimeAnalysis, InsightClient, ProductivityInsights, ScheduleSuggestion};
pub use extract::{extract_recommendations, extract_schedule, extract_section};
pub use snapshot::InsightSnapshot;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::InsightError;

/// Where a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Generated,
    Fallback,
}

/// Combined coaching report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub optimal_intervals: String,
    pub optimal_focus_times: FocusTimeAnalysis,
    pub motivation_message: String,
    pub source: InsightSource,
}

impl Insights {
    /// Static report used whenever generation fails.
    pub fn fallback() -> Self {
        Self {
            analysis: "You're most productive in the morning between 9-11 AM. You tend to \
                complete tasks more efficiently when you work in focused sprints. Your \
                completion rate is higher for work-related tasks compared to personal tasks."
                .into(),
            recommendations: vec![
                "Schedule your most important tasks during your peak productivity time (9-11 AM)."
                    .into(),
                "Use 25-minute focused work periods followed by 5-minute breaks to maintain concentration."
                    .into(),
                "Break down larger tasks into smaller, more manageable subtasks to improve completion rates."
                    .into(),
            ],
            optimal_intervals: "Based on your patterns, 25-minute work periods with 5-minute \
                breaks work best for you. Consider a longer 15-minute break after every 4 work periods."
                .into(),
            optimal_focus_times: FocusTimeAnalysis {
                optimal_time_of_day: "9:00 AM - 11:30 AM".into(),
                recommended_duration: "25 minutes".into(),
                pattern_analysis: "You tend to be most focused and effective in the morning \
                    hours. Your productivity declines after lunch but picks up again in the late afternoon."
                    .into(),
                raw_response: String::new(),
            },
            motivation_message: "Great job completing that major project! With 3 high-priority \
                tasks on your plate, remember how effectively you've handled challenges before. \
                Try applying your morning focus powers to tackle the most important task first. \
                You've got this!"
                .into(),
            source: InsightSource::Fallback,
        }
    }
}

/// Generate the full report with one attempt per request.
///
/// # Errors
/// Any transport, status or empty-reply error from the completion API.
pub async fn generate(
    client: &InsightClient,
    snapshot: &InsightSnapshot,
) -> Result<Insights, InsightError> {
    let productivity = client.productivity_insights(snapshot).await?;
    if productivity.is_empty() {
        return Err(InsightError::EmptyCompletion);
    }
    let focus_times = client.optimal_focus_times(&snapshot.focus_sessions).await?;
    let motivation = client.motivation_message(snapshot).await?;
    Ok(Insights {
        analysis: productivity.analysis,
        recommendations: productivity.recommendations,
        optimal_intervals: productivity.optimal_intervals,
        optimal_focus_times: focus_times,
        motivation_message: motivation,
        source: InsightSource::Generated,
    })
}

/// [`generate`], substituting [`Insights::fallback`] on any failure.
pub async fn generate_or_fallback(client: &InsightClient, snapshot: &InsightSnapshot) -> Insights {
    match generate(client, snapshot).await {
        Ok(insights) => {
            info!("generated coaching insights");
            insights
        }
        Err(e) => {
            warn!(error = %e, "insight generation failed, using fallback");
            Insights::fallback()
        }
    }
}
