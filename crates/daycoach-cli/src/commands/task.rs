//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use daycoach_core::storage::Database;
use daycoach_core::task::{TaskDraft, TaskStatus};

use super::parse_date;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task under a goal
    Create {
        /// Goal ID to attach to
        goal_id: i64,
        /// Task title
        title: String,
        /// Impact 1-5 (default: 1)
        #[arg(long, default_value = "1")]
        impact: i64,
        /// Estimated minutes 1-600 (default: 30)
        #[arg(long, default_value = "30")]
        effort_min: i64,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        /// Status: pending, doing, or done (default: pending)
        #[arg(long, default_value = "pending")]
        status: String,
        /// Parent task ID
        #[arg(long)]
        parent: Option<i64>,
    },
    /// List tasks
    List {
        /// Filter by goal ID
        #[arg(long)]
        goal: Option<i64>,
        /// Only tasks not yet done
        #[arg(long)]
        open: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New status: pending, doing, or done
        #[arg(long)]
        status: Option<String>,
        /// New impact 1-5
        #[arg(long)]
        impact: Option<i64>,
        /// New estimated minutes
        #[arg(long)]
        effort_min: Option<i64>,
        /// New due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Create {
            goal_id,
            title,
            impact,
            effort_min,
            due,
            status,
            parent,
        } => {
            let draft = TaskDraft {
                title,
                status: TaskStatus::try_parse(&status)?,
                impact,
                effort_min,
                due,
                parent_task_id: parent,
            };
            draft.validate()?;
            let task = db.insert_task(goal_id, &draft)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { goal, open } => {
            let tasks = if open {
                db.open_tasks()?
                    .into_iter()
                    .filter(|t| goal.map_or(true, |g| t.goal_id == g))
                    .collect()
            } else {
                db.list_tasks(goal)?
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Update {
            id,
            title,
            status,
            impact,
            effort_min,
            due,
        } => {
            let mut task = db
                .get_task(id)?
                .ok_or_else(|| format!("no task with id {id}"))?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(status) = status {
                task.status = TaskStatus::try_parse(&status)?;
            }
            if let Some(impact) = impact {
                task.impact = impact;
            }
            if let Some(effort_min) = effort_min {
                task.effort_min = effort_min;
            }
            if due.is_some() {
                task.due = due;
            }
            let draft = TaskDraft {
                title: task.title.clone(),
                status: task.status,
                impact: task.impact,
                effort_min: task.effort_min,
                due: task.due,
                parent_task_id: task.parent_task_id,
            };
            draft.validate()?;
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Done { id } => {
            let mut task = db
                .get_task(id)?
                .ok_or_else(|| format!("no task with id {id}"))?;
            task.status = TaskStatus::Done;
            db.update_task(&task)?;
            println!("task {id} done");
        }
        TaskAction::Delete { id } => {
            db.delete_task(id)?;
            println!("task {id} deleted");
        }
    }
    Ok(())
}
