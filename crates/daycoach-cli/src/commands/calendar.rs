//! Calendar feed and availability commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use daycoach_core::calendar::{CalendarFeed, FreeTimeCalculator, WorkWindow};
use daycoach_core::review::jst_today;
use daycoach_core::storage::{Config, Database};

use super::parse_date;

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Store the ICS feed URL
    SetUrl {
        /// Feed URL (https://...ics)
        url: String,
    },
    /// Show the configured feed URL
    Show,
    /// Compute free minutes for a day
    Free {
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Working window start (HH:MM, default from config)
        #[arg(long)]
        work_start: Option<String>,
        /// Working window end (HH:MM, default from config)
        #[arg(long)]
        work_end: Option<String>,
        /// Block granularity in minutes (default from config)
        #[arg(long)]
        min_block: Option<i64>,
    },
}

#[derive(Serialize)]
struct FreeReport {
    date: NaiveDate,
    work_start: String,
    work_end: String,
    min_block: i64,
    busy_intervals: usize,
    busy_minutes: i64,
    free_minutes: i64,
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        CalendarAction::SetUrl { url } => {
            // Validate before persisting.
            CalendarFeed::new(&url)?;
            db.integration_set("gcal_ics", "default", &url)?;
            println!("calendar feed updated");
        }
        CalendarAction::Show => match super::plan::feed_url(&db, &config)? {
            Some(url) => println!("{url}"),
            None => println!("no calendar feed configured"),
        },
        CalendarAction::Free {
            date,
            work_start,
            work_end,
            min_block,
        } => {
            let url = super::plan::feed_url(&db, &config)?
                .ok_or("no calendar feed configured; run `calendar set-url` first")?;
            let day = date.unwrap_or_else(jst_today);
            let work_start = work_start.unwrap_or(config.calendar.work_start);
            let work_end = work_end.unwrap_or(config.calendar.work_end);
            let min_block = min_block.unwrap_or(config.calendar.min_block);

            let feed = CalendarFeed::new(&url)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let spans = runtime.block_on(feed.fetch_busy_spans(day))?;

            let window = WorkWindow::from_hhmm(day, &work_start, &work_end)?;
            let free = FreeTimeCalculator::new()
                .with_min_block(min_block)
                .free_minutes(&spans, &window);
            let busy_minutes: i64 = spans.iter().map(|s| s.duration_minutes()).sum();

            let report = FreeReport {
                date: day,
                work_start,
                work_end,
                min_block,
                busy_intervals: spans.len(),
                busy_minutes,
                free_minutes: free,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
