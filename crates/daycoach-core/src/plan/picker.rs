//! Greedy daily shortlist selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::score::score_task;
use crate::task::Task;

/// Hard cap on picks per invocation. A short daily shortlist is the product
/// intent, so this is a design constant rather than configuration.
pub const MAX_PICKS: usize = 3;

/// A task paired with its score for one planning run. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTask {
    pub task: Task,
    pub score: f64,
}

/// Rank open tasks and greedily select a shortlist fitting the budget.
///
/// Tasks are scored against `today`, sorted descending by score (stable, so
/// ties keep their input order), then accepted in order while their effort
/// fits the remaining budget. The first task is always accepted even when it
/// overflows the budget: if any open task exists the result is never empty.
/// Tasks with a zero or missing estimate consume
/// [`DEFAULT_EFFORT_MIN`](crate::task::DEFAULT_EFFORT_MIN) from the budget.
///
/// Never fails; empty input yields an empty result.
pub fn pick_today_tasks(
    tasks: Vec<Task>,
    minutes_available: i64,
    today: NaiveDate,
) -> Vec<ScoredTask> {
    let mut scored: Vec<ScoredTask> = tasks
        .into_iter()
        .map(|task| {
            let score = score_task(task.impact, task.effort_min, task.due, today);
            ScoredTask { task, score }
        })
        .collect();

    // Stable sort keeps enumeration order on ties, which makes repeated
    // runs over the same input deterministic.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut picked = Vec::new();
    let mut remaining = minutes_available.max(1);
    for entry in scored {
        let effort = entry.task.planning_effort_min();
        if effort <= remaining || picked.is_empty() {
            remaining -= effort;
            picked.push(entry);
        }
        if picked.len() >= MAX_PICKS {
            break;
        }
    }
    picked
}
