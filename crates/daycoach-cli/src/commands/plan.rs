//! Daily plan command: scored shortlist under a minutes budget.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use daycoach_core::calendar::CalendarFeed;
use daycoach_core::coach::{coach_line_for_task, TextGenerator};
use daycoach_core::plan::pick_today_tasks;
use daycoach_core::review::jst_today;
use daycoach_core::storage::{Config, Database};
use daycoach_core::task::TaskStatus;

use super::parse_date;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Compute today's shortlist
    Today {
        /// Minutes budget; defaults to the calendar feed when configured,
        /// otherwise the configured planning budget
        #[arg(long)]
        minutes: Option<i64>,
        /// Plan for a specific date (YYYY-MM-DD) instead of today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

/// One row of the printed plan.
#[derive(Serialize)]
struct PlanItem {
    task_id: i64,
    goal_id: i64,
    title: String,
    status: TaskStatus,
    impact: i64,
    effort_min: i64,
    due: Option<NaiveDate>,
    score: f64,
    coach_line: String,
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let PlanAction::Today { minutes, date } = action;

    let config = Config::load_or_default();
    let db = Database::open()?;
    let today = date.unwrap_or_else(jst_today);
    let runtime = tokio::runtime::Runtime::new()?;

    let budget = match minutes {
        Some(m) => m,
        None => match feed_url(&db, &config)? {
            Some(url) => {
                let feed = CalendarFeed::new(&url)?;
                let spans = runtime.block_on(feed.fetch_busy_spans(today))?;
                let window = daycoach_core::calendar::WorkWindow::from_hhmm(
                    today,
                    &config.calendar.work_start,
                    &config.calendar.work_end,
                )?;
                let free = daycoach_core::calendar::FreeTimeCalculator::new()
                    .with_min_block(config.calendar.min_block)
                    .free_minutes(&spans, &window);
                // An empty window still has to yield a usable plan.
                free.max(1)
            }
            None => config.plan.minutes_available,
        },
    };

    let tasks = db.open_tasks()?;
    let picked = pick_today_tasks(tasks, budget, today);

    let generator = TextGenerator::from_config(&config.ai);
    let items: Vec<PlanItem> = runtime.block_on(async {
        let mut items = Vec::with_capacity(picked.len());
        for entry in picked {
            let coach_line =
                coach_line_for_task(&generator, &entry.task.title, entry.task.effort_min).await;
            items.push(PlanItem {
                task_id: entry.task.id,
                goal_id: entry.task.goal_id,
                title: entry.task.title,
                status: entry.task.status,
                impact: entry.task.impact,
                effort_min: entry.task.effort_min,
                due: entry.task.due,
                score: entry.score,
                coach_line,
            });
        }
        items
    });

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

/// The integrations table takes precedence over the config file.
pub(crate) fn feed_url(
    db: &Database,
    config: &Config,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if let Some(url) = db.integration_get("gcal_ics", "default")? {
        return Ok(Some(url));
    }
    Ok(config.calendar.feed_url.clone())
}
