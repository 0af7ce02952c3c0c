//! Weekly review generation and persistence.
//!
//! One "weekly" suggestion exists per Sunday-anchored week; regenerating
//! within the same week updates it in place.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::reference_tz;
use crate::coach::{summarize_reflections, TextGenerator};
use crate::error::CoreError;
use crate::storage::Database;
use crate::task::Suggestion;

/// Today's date in the reference timezone.
pub fn jst_today() -> NaiveDate {
    Utc::now().with_timezone(&reference_tz()).date_naive()
}

/// The date window a review covers, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRange {
    pub days: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Payload of one weekly review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReview {
    pub range: ReviewRange,
    pub count: usize,
    pub summary: String,
    pub improvements: Vec<String>,
    pub generated_at: NaiveDate,
}

/// Build the review payload for the trailing `days`-day window ending today.
pub async fn generate_weekly_payload(
    db: &Database,
    generator: &TextGenerator,
    days: i64,
) -> Result<WeeklyReview, CoreError> {
    let today = jst_today();
    let start = today - Duration::days(days - 1);
    let notes = db.reflections_since(start)?;
    let digest = summarize_reflections(generator, &notes, days).await;

    Ok(WeeklyReview {
        range: ReviewRange {
            days,
            start,
            end: today,
        },
        count: notes.len(),
        summary: digest.summary,
        improvements: digest.improvements,
        generated_at: today,
    })
}

/// The Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let sun_shift = (date.weekday().num_days_from_monday() as i64 + 1) % 7;
    date - Duration::days(sun_shift)
}

/// Generate this week's review and store it, replacing any earlier one
/// from the same week.
pub async fn upsert_this_week(
    db: &Database,
    generator: &TextGenerator,
) -> Result<Suggestion, CoreError> {
    let today = jst_today();
    let start = week_start(today);
    let end = start + Duration::days(6);

    let payload = generate_weekly_payload(db, generator, 7).await?;
    let content = serde_json::to_string(&payload)?;

    let existing = db.find_suggestion_in_range("weekly", start, end)?;
    let stored = match existing {
        Some(sug) => db.update_suggestion(sug.id, today, &content)?,
        None => db.insert_suggestion(today, "weekly", &content)?,
    };
    Ok(stored)
}
