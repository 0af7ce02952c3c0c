//! Goal management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use daycoach_core::storage::Database;
use daycoach_core::task::GoalDraft;

use super::parse_date;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Create {
        /// Goal title
        title: String,
        /// Why this goal matters
        #[arg(long, default_value = "")]
        why: String,
        /// Key goal indicator
        #[arg(long, default_value = "")]
        kgi: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
        /// Life area (default: general)
        #[arg(long, default_value = "general")]
        area: String,
    },
    /// List goals
    List,
    /// Get goal details
    Get {
        /// Goal ID
        id: i64,
    },
    /// Update a goal
    Update {
        /// Goal ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New why
        #[arg(long)]
        why: Option<String>,
        /// New KGI
        #[arg(long)]
        kgi: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
        /// New area
        #[arg(long)]
        area: Option<String>,
    },
    /// Delete a goal and all of its tasks
    Delete {
        /// Goal ID
        id: i64,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Create {
            title,
            why,
            kgi,
            deadline,
            area,
        } => {
            let draft = GoalDraft {
                title,
                why,
                kgi,
                deadline,
                area,
            };
            draft.validate()?;
            let goal = db.insert_goal(&draft)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List => {
            let goals = db.list_goals()?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Get { id } => match db.get_goal(id)? {
            Some(goal) => println!("{}", serde_json::to_string_pretty(&goal)?),
            None => return Err(format!("no goal with id {id}").into()),
        },
        GoalAction::Update {
            id,
            title,
            why,
            kgi,
            deadline,
            area,
        } => {
            let mut goal = db
                .get_goal(id)?
                .ok_or_else(|| format!("no goal with id {id}"))?;
            if let Some(title) = title {
                goal.title = title;
            }
            if let Some(why) = why {
                goal.why = why;
            }
            if let Some(kgi) = kgi {
                goal.kgi = kgi;
            }
            if deadline.is_some() {
                goal.deadline = deadline;
            }
            if let Some(area) = area {
                goal.area = area;
            }
            db.update_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Delete { id } => {
            db.delete_goal(id)?;
            println!("goal {id} deleted");
        }
    }
    Ok(())
}
