//! Integration tests for the daily plan engine, from storage to shortlist.

use chrono::NaiveDate;
use proptest::prelude::*;

use daycoach_core::plan::{pick_today_tasks, MAX_PICKS};
use daycoach_core::storage::Database;
use daycoach_core::task::{GoalDraft, Task, TaskDraft, TaskStatus};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seeded_db() -> (Database, i64) {
    let db = Database::open_memory().unwrap();
    let goal = db.insert_goal(&GoalDraft::new("Ship the report")).unwrap();
    (db, goal.id)
}

fn draft(title: &str, impact: i64, effort_min: i64, due: Option<NaiveDate>) -> TaskDraft {
    TaskDraft {
        impact,
        effort_min,
        due,
        ..TaskDraft::new(title)
    }
}

#[test]
fn planner_uses_open_tasks_only() {
    let (db, goal_id) = seeded_db();
    let today = d(2025, 9, 15);

    db.insert_task(goal_id, &draft("urgent", 5, 60, Some(today)))
        .unwrap();
    let mut done = db
        .insert_task(goal_id, &draft("already finished", 5, 10, Some(today)))
        .unwrap();
    done.status = TaskStatus::Done;
    db.update_task(&done).unwrap();

    let picked = pick_today_tasks(db.open_tasks().unwrap(), 90, today);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].task.title, "urgent");
}

#[test]
fn scenario_both_tasks_fit_ninety_minutes() {
    let (db, goal_id) = seeded_db();
    let today = d(2025, 9, 15);

    db.insert_task(goal_id, &draft("high impact due today", 5, 60, Some(today)))
        .unwrap();
    db.insert_task(goal_id, &draft("small filler", 1, 30, None))
        .unwrap();

    let picked = pick_today_tasks(db.open_tasks().unwrap(), 90, today);
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].task.title, "high impact due today");
    assert!(picked[0].score > picked[1].score);
    // 90 - 60 - 30 leaves exactly nothing; a third task would not fit.
    let total: i64 = picked.iter().map(|p| p.task.effort_min).sum();
    assert_eq!(total, 90);
}

#[test]
fn scenario_oversized_task_is_guaranteed() {
    let (db, goal_id) = seeded_db();
    let today = d(2025, 9, 15);
    db.insert_task(goal_id, &draft("giant refactor", 3, 500, None))
        .unwrap();

    let picked = pick_today_tasks(db.open_tasks().unwrap(), 60, today);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].task.title, "giant refactor");
}

#[test]
fn repeated_runs_return_identical_plans() {
    let (db, goal_id) = seeded_db();
    let today = d(2025, 9, 15);
    for i in 0..5 {
        db.insert_task(goal_id, &draft(&format!("task {i}"), 3, 30, None))
            .unwrap();
    }

    let tasks = db.open_tasks().unwrap();
    let first = pick_today_tasks(tasks.clone(), 90, today);
    for _ in 0..10 {
        let again = pick_today_tasks(tasks.clone(), 90, today);
        let ids_a: Vec<i64> = first.iter().map(|p| p.task.id).collect();
        let ids_b: Vec<i64> = again.iter().map(|p| p.task.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}

fn arb_task(id: i64) -> impl Strategy<Value = Task> {
    (
        1i64..=5,
        0i64..=600,
        proptest::option::of(0i64..30),
    )
        .prop_map(move |(impact, effort_min, due_offset)| Task {
            id,
            goal_id: 1,
            title: format!("task {id}"),
            status: TaskStatus::Pending,
            impact,
            effort_min,
            due: due_offset.map(|off| d(2025, 9, 1) + chrono::Duration::days(off)),
            parent_task_id: None,
        })
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    (0usize..20).prop_flat_map(|n| (0..n).map(|i| arb_task(i as i64)).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn shortlist_invariants(tasks in arb_tasks(), minutes in 1i64..=600) {
        let today = d(2025, 9, 15);
        let picked = pick_today_tasks(tasks.clone(), minutes, today);

        // Cap invariant.
        prop_assert!(picked.len() <= MAX_PICKS);
        // Guaranteed progress.
        prop_assert_eq!(picked.is_empty(), tasks.is_empty());
        // Scores are non-increasing.
        for pair in picked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        // Picked tasks come from the input.
        for p in &picked {
            prop_assert!(tasks.iter().any(|t| t.id == p.task.id));
        }
    }

    #[test]
    fn budget_is_respected_after_the_first_pick(tasks in arb_tasks(), minutes in 1i64..=600) {
        let today = d(2025, 9, 15);
        let picked = pick_today_tasks(tasks, minutes, today);

        // Every pick after the first had to fit what remained at its turn.
        let mut remaining = minutes.max(1);
        for (i, p) in picked.iter().enumerate() {
            let effort = p.task.planning_effort_min();
            if i > 0 {
                prop_assert!(effort <= remaining);
            }
            remaining -= effort;
        }
    }
}
