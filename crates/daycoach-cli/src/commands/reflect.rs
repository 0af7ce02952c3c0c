//! Reflection commands for CLI.

use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use serde::Serialize;

use daycoach_core::review::jst_today;
use daycoach_core::storage::Database;
use daycoach_core::task::ReflectionDraft;

use super::parse_date;

#[derive(Subcommand)]
pub enum ReflectAction {
    /// Record a reflection note
    Add {
        /// Note text
        text: String,
        /// Mood 1-5 (default: 3)
        #[arg(long, default_value = "3")]
        mood: i64,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List recent reflections
    List {
        /// Trailing window in days (default: 7)
        #[arg(long, default_value = "7")]
        days: i64,
    },
    /// Summary statistics over recent reflections
    Summary {
        /// Trailing window in days (default: 7)
        #[arg(long, default_value = "7")]
        days: i64,
    },
}

#[derive(Serialize)]
struct ReflectionSummary {
    days: i64,
    count: usize,
    avg_mood: Option<f64>,
    latest_text: Option<String>,
    latest_date: Option<NaiveDate>,
}

pub fn run(action: ReflectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ReflectAction::Add { text, mood, date } => {
            let draft = ReflectionDraft { date, text, mood };
            draft.validate()?;
            let note = db.insert_reflection(&draft, jst_today())?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        ReflectAction::List { days } => {
            let start = jst_today() - Duration::days(days - 1);
            let notes = db.reflections_since(start)?;
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        ReflectAction::Summary { days } => {
            let start = jst_today() - Duration::days(days - 1);
            let notes = db.reflections_since(start)?;
            let avg_mood = if notes.is_empty() {
                None
            } else {
                Some(notes.iter().map(|n| n.mood as f64).sum::<f64>() / notes.len() as f64)
            };
            let summary = ReflectionSummary {
                days,
                count: notes.len(),
                avg_mood,
                latest_text: notes.first().map(|n| n.text.clone()),
                latest_date: notes.first().map(|n| n.date),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
