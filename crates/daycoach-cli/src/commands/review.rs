//! Weekly review commands for CLI.

use chrono::{NaiveTime, Weekday};
use clap::Subcommand;

use daycoach_core::coach::TextGenerator;
use daycoach_core::review::{generate_weekly_payload, upsert_this_week, WeeklyReview};
use daycoach_core::runner::{JobRunner, WeeklySchedule};
use daycoach_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Generate this week's review and store it
    Generate,
    /// Preview the review without storing it
    Preview {
        /// Trailing window in days (default: 7)
        #[arg(long, default_value = "7")]
        days: i64,
    },
    /// Show the most recent stored review
    Latest,
    /// Run the periodic runner that regenerates the review every Sunday
    /// at 21:00 until interrupted
    Daemon,
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        ReviewAction::Generate => {
            let db = Database::open()?;
            let generator = TextGenerator::from_config(&config.ai);
            let stored = runtime.block_on(upsert_this_week(&db, &generator))?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        ReviewAction::Preview { days } => {
            let db = Database::open()?;
            let generator = TextGenerator::from_config(&config.ai);
            let payload = runtime.block_on(generate_weekly_payload(&db, &generator, days))?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        ReviewAction::Latest => {
            let db = Database::open()?;
            match db.latest_suggestion("weekly")? {
                Some(sug) => {
                    let payload: WeeklyReview = serde_json::from_str(&sug.content_json)?;
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                None => println!("no stored review yet"),
            }
        }
        ReviewAction::Daemon => {
            runtime.block_on(async {
                let mut runner = JobRunner::new();
                let schedule = WeeklySchedule::new(
                    Weekday::Sun,
                    NaiveTime::from_hms_opt(21, 0, 0).expect("valid time"),
                );
                runner.register("weekly-review", schedule, move || {
                    // The job fires inside the runtime, so the async work
                    // is handed to a fresh task.
                    tokio::spawn(async {
                        let config = Config::load_or_default();
                        let db = match Database::open() {
                            Ok(db) => db,
                            Err(e) => {
                                eprintln!("weekly review failed: {e}");
                                return;
                            }
                        };
                        let generator = TextGenerator::from_config(&config.ai);
                        if let Err(e) = upsert_this_week(&db, &generator).await {
                            eprintln!("weekly review failed: {e}");
                        }
                    });
                });
                runner.start();
                println!("review daemon running; press Ctrl-C to stop");
                let _ = tokio::signal::ctrl_c().await;
                runner.shutdown().await;
            });
        }
    }
    Ok(())
}
