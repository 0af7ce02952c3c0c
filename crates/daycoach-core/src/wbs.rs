//! Work-breakdown-structure planning for a goal.
//!
//! Generation tries the text generator first, extracting a JSON array from
//! its output; anything unusable falls back to a fixed starter plan. Items
//! are then cleaned (clamped ranges, trimmed titles) and optionally spread
//! across the days until the goal's deadline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coach::TextGenerator;
use crate::task::Goal;

const SYSTEM: &str =
    "You are an expert at building execution plans. Keep items short, concrete, in execution order.";

/// One planned sub-task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WbsTask {
    pub title: String,
    pub effort_min: i64,
    pub impact: i64,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub prereq_ids: Vec<usize>,
}

impl WbsTask {
    fn new(title: &str, effort_min: i64, impact: i64) -> Self {
        Self {
            title: title.to_string(),
            effort_min,
            impact,
            due: None,
            prereq_ids: Vec::new(),
        }
    }
}

/// Parameters for one plan generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WbsPlanRequest {
    #[serde(default = "default_minutes_per_day")]
    pub minutes_per_day: i64,
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
    #[serde(default = "default_true")]
    pub spread_until_deadline: bool,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_minutes_per_day() -> i64 {
    90
}

fn default_max_tasks() -> usize {
    12
}

fn default_true() -> bool {
    true
}

impl Default for WbsPlanRequest {
    fn default() -> Self {
        Self {
            minutes_per_day: default_minutes_per_day(),
            max_tasks: default_max_tasks(),
            spread_until_deadline: true,
            dry_run: false,
        }
    }
}

/// Generate a cleaned WBS plan for `goal`.
pub async fn generate_wbs(
    generator: &TextGenerator,
    goal: &Goal,
    req: &WbsPlanRequest,
    today: NaiveDate,
) -> Vec<WbsTask> {
    let items = ai_generate(generator, goal, req)
        .await
        .unwrap_or_else(|| rule_generate(req));

    let mut cleaned: Vec<WbsTask> = items
        .into_iter()
        .take(req.max_tasks)
        .map(|it| {
            let impact = it.impact.clamp(1, 5);
            let effort_cap = if impact >= 4 { 120 } else { 60 };
            WbsTask {
                title: truncate_title(it.title.trim()),
                effort_min: it.effort_min.clamp(5, effort_cap),
                impact,
                due: it.due,
                prereq_ids: it.prereq_ids,
            }
        })
        .collect();

    if let Some(deadline) = goal.deadline {
        if req.spread_until_deadline {
            if deadline < today {
                for it in cleaned.iter_mut().filter(|it| it.due.is_none()) {
                    it.due = Some(today);
                }
            } else {
                spread_due(&mut cleaned, today, deadline);
            }
        }
    }
    cleaned
}

async fn ai_generate(
    generator: &TextGenerator,
    goal: &Goal,
    req: &WbsPlanRequest,
) -> Option<Vec<WbsTask>> {
    let deadline = goal
        .deadline
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none".to_string());
    let user = format!(
        "Goal: {title}\nWhy: {why}\nKGI: {kgi}\nDeadline: {deadline}\n\n\
         Constraints:\n\
         - One task should take 30-60 minutes (the first two may be 5-10 minute starters)\n\
         - Order by execution, respecting dependencies\n\
         - Output ONLY a JSON array; each element is {{\"title\", \"effort_min\", \"impact\", \
         \"due\" (nullable), \"prereq_ids\" (may be [])}}\n\n\
         Example:\n\
         [\n\
           {{\"title\":\"Outline the README sections\",\"effort_min\":10,\"impact\":3,\"due\":null,\"prereq_ids\":[]}},\n\
           {{\"title\":\"Create the API skeleton\",\"effort_min\":45,\"impact\":5,\"due\":null,\"prereq_ids\":[0]}}\n\
         ]\n\n\
         Now output at most {max_tasks} items.",
        title = goal.title,
        why = goal.why,
        kgi = goal.kgi,
        max_tasks = req.max_tasks,
    );
    let raw = generator.generate(SYSTEM, &user, 800).await;
    parse_wbs_array(&raw)
}

/// Pull the first `[...]` span out of the output and deserialize it,
/// skipping elements that are not valid task objects.
fn parse_wbs_array(raw: &str) -> Option<Vec<WbsTask>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw[start..=end]).ok()?;
    let items: Vec<WbsTask> = values
        .into_iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Fixed starter plan used when generation yields nothing usable.
fn rule_generate(req: &WbsPlanRequest) -> Vec<WbsTask> {
    let base = vec![
        WbsTask::new("Write one paragraph on purpose and scope", 10, 3),
        WbsTask::new("Draft the chapter list / table of contents", 20, 3),
        WbsTask::new("Build the minimal skeleton", 40, 5),
        WbsTask::new("Implement the first key feature", 60, 5),
        WbsTask::new("Implement the second key feature", 60, 4),
        WbsTask::new("Update the README", 30, 2),
        WbsTask::new("Light end-to-end pass and follow-up sweep", 30, 3),
    ];
    base.into_iter().take(req.max_tasks).collect()
}

/// Distribute missing due dates evenly across `[start, end]`, keeping
/// explicit ones.
fn spread_due(items: &mut [WbsTask], start: NaiveDate, end: NaiveDate) {
    if start > end || items.is_empty() {
        return;
    }
    let span = (end - start).num_days().max(1);
    let n = items.len();
    for (i, it) in items.iter_mut().enumerate() {
        if it.due.is_some() {
            continue;
        }
        let pos = (i as i64 * span) / (n as i64 - 1).max(1);
        it.due = Some(start + chrono::Duration::days(pos));
    }
}

fn truncate_title(title: &str) -> String {
    title.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn goal(deadline: Option<NaiveDate>) -> Goal {
        Goal {
            id: 1,
            title: "Ship the side project".to_string(),
            why: "Learn by finishing".to_string(),
            kgi: "v0.1 released".to_string(),
            deadline,
            area: "general".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parse_extracts_array_from_prose() {
        let raw = "Here is your plan:\n[{\"title\":\"A\",\"effort_min\":30,\"impact\":3}]\nGood luck!";
        let items = parse_wbs_array(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "A");
    }

    #[test]
    fn parse_skips_non_objects() {
        let raw = "[{\"title\":\"A\",\"effort_min\":30,\"impact\":3}, 42, \"noise\"]";
        let items = parse_wbs_array(raw).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_wbs_array("no array here").is_none());
        assert!(parse_wbs_array("]wrong[").is_none());
        assert!(parse_wbs_array("[]").is_none());
    }

    #[tokio::test]
    async fn falls_back_to_rule_plan() {
        let g = TextGenerator::rule_based();
        let req = WbsPlanRequest::default();
        let items = generate_wbs(&g, &goal(None), &req, d(2025, 9, 15)).await;
        assert!(!items.is_empty());
        assert!(items.len() <= req.max_tasks);
        for it in &items {
            assert!((1..=5).contains(&it.impact));
            assert!(it.effort_min >= 5);
            assert!(it.due.is_none());
        }
    }

    #[tokio::test]
    async fn clamps_effort_by_impact() {
        let g = TextGenerator::rule_based();
        let req = WbsPlanRequest {
            max_tasks: 3,
            ..WbsPlanRequest::default()
        };
        let items = generate_wbs(&g, &goal(None), &req, d(2025, 9, 15)).await;
        assert_eq!(items.len(), 3);
        for it in &items {
            let cap = if it.impact >= 4 { 120 } else { 60 };
            assert!(it.effort_min <= cap);
        }
    }

    #[tokio::test]
    async fn spreads_due_dates_to_deadline() {
        let g = TextGenerator::rule_based();
        let req = WbsPlanRequest::default();
        let today = d(2025, 9, 15);
        let deadline = d(2025, 9, 21);
        let items = generate_wbs(&g, &goal(Some(deadline)), &req, today).await;

        assert_eq!(items.first().unwrap().due, Some(today));
        assert_eq!(items.last().unwrap().due, Some(deadline));
        let mut prev = today;
        for it in &items {
            let due = it.due.unwrap();
            assert!(due >= prev && due <= deadline);
            prev = due;
        }
    }

    #[tokio::test]
    async fn past_deadline_makes_everything_due_today() {
        let g = TextGenerator::rule_based();
        let req = WbsPlanRequest::default();
        let today = d(2025, 9, 15);
        let items = generate_wbs(&g, &goal(Some(d(2025, 9, 1))), &req, today).await;
        assert!(items.iter().all(|it| it.due == Some(today)));
    }

    #[test]
    fn spread_due_keeps_explicit_dates() {
        let mut items = vec![
            WbsTask::new("a", 30, 3),
            WbsTask {
                due: Some(d(2025, 9, 16)),
                ..WbsTask::new("b", 30, 3)
            },
            WbsTask::new("c", 30, 3),
        ];
        spread_due(&mut items, d(2025, 9, 15), d(2025, 9, 19));
        assert_eq!(items[1].due, Some(d(2025, 9, 16)));
        assert_eq!(items[0].due, Some(d(2025, 9, 15)));
        assert_eq!(items[2].due, Some(d(2025, 9, 19)));
    }
}
