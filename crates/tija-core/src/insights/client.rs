//! Completion API client for coaching text.
//!
//! Each call is a single POST of a prompt to `{api_url}/completions`; the
//! reply's `choices[0].text` is scraped with the helpers in
//! [`extract`](super::extract). No retries.

use std::time::Duration;

use indoc::formatdoc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::extract::{extract_recommendations, extract_schedule, extract_section};
use super::snapshot::InsightSnapshot;
use crate::error::InsightError;
use crate::focus::FocusSession;
use crate::storage::InsightsConfig;
use crate::task::Task;

/// Parsed reply to the productivity analysis prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductivityInsights {
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub optimal_intervals: String,
    pub raw_response: String,
}

impl ProductivityInsights {
    /// Nothing recognizable was extracted.
    pub fn is_empty(&self) -> bool {
        self.analysis.is_empty() && self.recommendations.is_empty()
    }
}

/// Parsed reply to the focus-time prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusTimeAnalysis {
    pub optimal_time_of_day: String,
    pub recommended_duration: String,
    pub pattern_analysis: String,
    pub raw_response: String,
}

/// Parsed reply to the schedule prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    pub schedule: Vec<String>,
    pub reasoning: String,
    pub raw_response: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

pub struct InsightClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl InsightClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 1000,
        }
    }

    /// Build a client from configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    /// [`InsightError::Disabled`] when insights are turned off,
    /// [`InsightError::MissingApiKey`] when the variable is unset or empty.
    pub fn from_config(config: &InsightsConfig) -> Result<Self, InsightError> {
        if !config.enabled {
            return Err(InsightError::Disabled);
        }
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| InsightError::MissingApiKey(config.api_key_env.clone()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Analysis, three recommendations and a work/break interval suggestion.
    pub async fn productivity_insights(
        &self,
        snapshot: &InsightSnapshot,
    ) -> Result<ProductivityInsights, InsightError> {
        let prompt = formatdoc! {"
            Analyze this user's productivity data and provide personalized insights and recommendations:

            Tasks:
            {tasks}

            Focus Sessions:
            {sessions}

            Completion Rates:
            {rates}

            Based on this data, please provide:
            1. An analysis of their current productivity patterns
            2. Three specific, actionable recommendations to improve productivity
            3. A suggestion for optimal work/break intervals
            ",
            tasks = to_json(&snapshot.tasks),
            sessions = to_json(&snapshot.focus_sessions),
            rates = to_json(&snapshot.completion_rates),
        };
        let text = self.complete(&prompt, self.max_tokens, 0.7).await?;
        Ok(ProductivityInsights {
            analysis: extract_section(&text, "analysis"),
            recommendations: extract_recommendations(&text),
            optimal_intervals: extract_section(&text, "optimal work/break intervals"),
            raw_response: text,
        })
    }

    /// Best time of day, session length and a pattern summary.
    pub async fn optimal_focus_times(
        &self,
        sessions: &[FocusSession],
    ) -> Result<FocusTimeAnalysis, InsightError> {
        let prompt = formatdoc! {"
            Analyze these focus session records to identify when the user is most productive:

            Focus Sessions:
            {sessions}

            Please provide:
            1. The optimal time of day for focused work
            2. Recommended session duration
            3. Pattern analysis
            ",
            sessions = to_json(sessions),
        };
        let text = self.complete(&prompt, 500, 0.4).await?;
        Ok(FocusTimeAnalysis {
            optimal_time_of_day: extract_section(&text, "optimal time"),
            recommended_duration: extract_section(&text, "recommended session duration"),
            pattern_analysis: extract_section(&text, "pattern analysis"),
            raw_response: text,
        })
    }

    /// Short encouraging message built from the snapshot's achievements and
    /// challenges.
    pub async fn motivation_message(&self, snapshot: &InsightSnapshot) -> Result<String, InsightError> {
        let prompt = formatdoc! {"
            Write a short, personalized motivation message for {name}.

            Recent achievements: {achievements}
            Current challenges: {challenges}

            The message should be positive, encouraging, and specific to their situation.
            Keep it under 100 words.
            ",
            name = snapshot.name,
            achievements = to_json(&snapshot.recent_achievements),
            challenges = to_json(&snapshot.current_challenges),
        };
        self.complete(&prompt, 200, 0.8).await
    }

    /// Suggested ordering of the given tasks over the day.
    pub async fn optimize_schedule(
        &self,
        tasks: &[Task],
        patterns: &serde_json::Value,
    ) -> Result<ScheduleSuggestion, InsightError> {
        let prompt = formatdoc! {"
            I need help optimizing this task schedule based on priorities and productivity patterns:

            Tasks:
            {tasks}

            User Productivity Patterns:
            {patterns}

            Please provide:
            1. An optimized schedule for these tasks
            2. Reasoning for the schedule
            ",
            tasks = to_json(tasks),
            patterns = patterns,
        };
        let text = self.complete(&prompt, self.max_tokens, 0.3).await?;
        Ok(ScheduleSuggestion {
            schedule: extract_schedule(&text),
            reasoning: extract_section(&text, "reasoning"),
            raw_response: text,
        })
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, InsightError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
        });
        debug!(url = %self.api_url, max_tokens, "requesting completion");

        let resp = self
            .http
            .post(format!("{}/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(InsightError::EmptyCompletion)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}
