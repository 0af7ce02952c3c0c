//! Storage tests against a real database file.

use chrono::NaiveDate;
use tempfile::tempdir;

use daycoach_core::storage::Database;
use daycoach_core::task::{GoalDraft, TaskDraft, TaskStatus};

#[test]
fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daycoach.db");

    let goal_id = {
        let db = Database::open_at(&path).unwrap();
        let goal = db
            .insert_goal(&GoalDraft {
                deadline: NaiveDate::from_ymd_opt(2025, 12, 31),
                ..GoalDraft::new("Finish the course")
            })
            .unwrap();
        db.insert_task(goal.id, &TaskDraft::new("watch lecture 1"))
            .unwrap();
        goal.id
    };

    let db = Database::open_at(&path).unwrap();
    let goal = db.get_goal(goal_id).unwrap().unwrap();
    assert_eq!(goal.title, "Finish the course");
    assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2025, 12, 31));

    let tasks = db.list_tasks(Some(goal_id)).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Pending);
}

#[test]
fn cascade_applies_on_file_databases_too() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daycoach.db");

    let db = Database::open_at(&path).unwrap();
    let goal = db.insert_goal(&GoalDraft::new("Throwaway")).unwrap();
    db.insert_task(goal.id, &TaskDraft::new("a")).unwrap();
    db.insert_task(goal.id, &TaskDraft::new("b")).unwrap();

    db.delete_goal(goal.id).unwrap();
    drop(db);

    // Foreign-key enforcement is per-connection; the cascade must already
    // have happened by the time we reopen.
    let db = Database::open_at(&path).unwrap();
    assert!(db.list_tasks(None).unwrap().is_empty());
}
