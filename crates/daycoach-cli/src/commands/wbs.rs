//! WBS planning commands for CLI.

use clap::Subcommand;
use serde::Serialize;

use daycoach_core::coach::TextGenerator;
use daycoach_core::review::jst_today;
use daycoach_core::storage::{Config, Database};
use daycoach_core::wbs::{generate_wbs, WbsPlanRequest, WbsTask};

#[derive(Subcommand)]
pub enum WbsAction {
    /// Generate a work-breakdown plan for a goal
    Plan {
        /// Goal ID
        goal_id: i64,
        /// Maximum number of items (default: 12)
        #[arg(long, default_value = "12")]
        max_tasks: usize,
        /// Daily minutes assumed when sizing items (default: 90)
        #[arg(long, default_value = "90")]
        minutes_per_day: i64,
        /// Do not spread due dates toward the goal deadline
        #[arg(long)]
        no_spread: bool,
        /// Save the items as pending tasks under the goal
        #[arg(long)]
        save: bool,
    },
}

#[derive(Serialize)]
struct WbsPlanResult {
    goal_id: i64,
    created_count: usize,
    items: Vec<WbsTask>,
    saved: bool,
}

pub fn run(action: WbsAction) -> Result<(), Box<dyn std::error::Error>> {
    let WbsAction::Plan {
        goal_id,
        max_tasks,
        minutes_per_day,
        no_spread,
        save,
    } = action;

    let config = Config::load_or_default();
    let db = Database::open()?;
    let goal = db
        .get_goal(goal_id)?
        .ok_or_else(|| format!("no goal with id {goal_id}"))?;

    let req = WbsPlanRequest {
        minutes_per_day,
        max_tasks,
        spread_until_deadline: !no_spread,
        dry_run: !save,
    };

    let generator = TextGenerator::from_config(&config.ai);
    let runtime = tokio::runtime::Runtime::new()?;
    let items = runtime.block_on(generate_wbs(&generator, &goal, &req, jst_today()));

    let created_count = if save {
        db.save_wbs_tasks(goal_id, &items)?
    } else {
        0
    };

    let result = WbsPlanResult {
        goal_id,
        created_count,
        items,
        saved: save,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
