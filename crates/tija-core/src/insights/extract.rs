//! Best-effort extraction from free-form completion text.
//!
//! The upstream text has no fixed format. These helpers look for a few
//! recognizable shapes and return empty results when nothing matches; they
//! never fail.

use once_cell::sync::Lazy;
use regex::Regex;

static ITEM_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s+").expect("valid regex"));
static ITEM_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\d+\.").expect("valid regex"));
static SCHEDULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+[:.]\d+\s*[ap]m\s*-|morning:|afternoon:|evening:)")
        .expect("valid regex")
});

/// Text following `keyword` (plus any `:`/whitespace) up to the next blank
/// line or the end of the text. Case-insensitive. Empty when not found.
pub fn extract_section(text: &str, keyword: &str) -> String {
    let pattern = format!(r"(?i){}[:\s]+(.*?)(?:\n\n|$)", regex::escape(keyword));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Numbered items (`1. ...`), each running to the next line that starts
/// with a number and a dot, or to the end of the text.
pub fn extract_recommendations(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut pos = 0;
    while let Some(marker) = ITEM_MARKER.find_at(text, pos) {
        let start = marker.end();
        let end = ITEM_BOUNDARY
            .find_at(text, start)
            .map(|b| b.start())
            .unwrap_or(text.len());
        items.push(text[start..end].trim().to_string());
        pos = end.max(start);
    }
    items
}

/// Lines that look like schedule entries: `9:00 am - ...` or
/// `Morning:`/`Afternoon:`/`Evening:` headings.
pub fn extract_schedule(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| SCHEDULE_LINE.is_match(line))
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Analysis: You focus best early in the day.\n\n\
        Recommendations:\n\
        1. Start with the hardest task.\n\
        2. Keep sessions to 25 minutes,\nwith short breaks.\n\
        3. Review progress at 4.30 pm.\n\n\
        Optimal work/break intervals: 25 minutes on, 5 minutes off.";

    #[test]
    fn section_is_captured_until_blank_line() {
        assert_eq!(
            extract_section(SAMPLE, "analysis"),
            "You focus best early in the day."
        );
        assert_eq!(
            extract_section(SAMPLE, "optimal work/break intervals"),
            "25 minutes on, 5 minutes off."
        );
    }

    #[test]
    fn section_missing_keyword_is_empty() {
        assert_eq!(extract_section(SAMPLE, "reasoning"), "");
        assert_eq!(extract_section("", "analysis"), "");
    }

    #[test]
    fn section_keyword_is_not_a_pattern() {
        assert_eq!(extract_section("a.b: literal\n\n", "a.b"), "literal");
        assert_eq!(extract_section("axb: nope", "a.b"), "");
    }

    #[test]
    fn recommendations_split_on_numbered_lines() {
        let recs = extract_recommendations(SAMPLE);
        assert_eq!(
            recs,
            vec![
                "Start with the hardest task.".to_string(),
                "Keep sessions to 25 minutes,\nwith short breaks.".to_string(),
                "Review progress at 4.30 pm.\n\nOptimal work/break intervals: 25 minutes on, 5 minutes off."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn no_numbered_items_yields_nothing() {
        assert!(extract_recommendations("Just keep going.").is_empty());
    }

    #[test]
    fn schedule_lines_are_picked_out() {
        let text = "Here is a plan:\n9:00 am - Deep work\n10.30 AM - Email\nMorning: review\nlunch\nEvening: wrap up";
        assert_eq!(
            extract_schedule(text),
            vec!["9:00 am - Deep work", "10.30 AM - Email", "Morning: review", "Evening: wrap up"]
        );
    }
}
