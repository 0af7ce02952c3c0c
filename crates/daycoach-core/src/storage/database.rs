//! SQLite-based storage for goals, tasks, reflections, and suggestions.
//!
//! Goals exclusively own their tasks: the schema enforces it with
//! `ON DELETE CASCADE`, so deleting a goal removes its tasks in the same
//! statement.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::{data_dir, migrations};
use crate::error::DatabaseError;
use crate::task::{Goal, GoalDraft, Reflection, ReflectionDraft, Suggestion, Task, TaskDraft, TaskStatus};
use crate::wbs::WbsTask;

/// Parse an RFC3339 datetime with fallback to the current time, so one bad
/// row never poisons a listing.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date_opt(date_str: Option<String>) -> Option<NaiveDate> {
    date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn row_to_goal(row: &rusqlite::Row) -> Result<Goal, rusqlite::Error> {
    let deadline: Option<String> = row.get(4)?;
    let created_at: String = row.get(6)?;
    Ok(Goal {
        id: row.get(0)?,
        title: row.get(1)?,
        why: row.get(2)?,
        kgi: row.get(3)?,
        deadline: parse_date_opt(deadline),
        area: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status: String = row.get(3)?;
    let due: Option<String> = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        title: row.get(2)?,
        status: TaskStatus::parse(&status),
        impact: row.get(4)?,
        effort_min: row.get(5)?,
        due: parse_date_opt(due),
        parent_task_id: row.get(7)?,
    })
}

fn row_to_reflection(row: &rusqlite::Row) -> Result<Reflection, rusqlite::Error> {
    let date: String = row.get(1)?;
    let created_at: String = row.get(4)?;
    Ok(Reflection {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
        text: row.get(2)?,
        mood: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

fn row_to_suggestion(row: &rusqlite::Row) -> Result<Suggestion, rusqlite::Error> {
    let date: String = row.get(1)?;
    Ok(Suggestion {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
        kind: row.get(2)?,
        content_json: row.get(3)?,
    })
}

const GOAL_COLUMNS: &str = "id, title, why, kgi, deadline, area, created_at";
const TASK_COLUMNS: &str = "id, goal_id, title, status, impact, effort_min, due, parent_task_id";

/// SQLite database for daycoach data.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/daycoach/daycoach.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?
            .join("daycoach.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        Self::initialize(conn)
    }

    /// Open an in-memory database (tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Goals ===

    pub fn insert_goal(&self, draft: &GoalDraft) -> Result<Goal, DatabaseError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO goals (title, why, kgi, deadline, area, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.title,
                draft.why,
                draft.kgi,
                draft.deadline.map(|d| d.to_string()),
                draft.area,
                created_at.to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Goal {
            id,
            title: draft.title.clone(),
            why: draft.why.clone(),
            kgi: draft.kgi.clone(),
            deadline: draft.deadline,
            area: draft.area.clone(),
            created_at,
        })
    }

    pub fn list_goals(&self) -> Result<Vec<Goal>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {GOAL_COLUMNS} FROM goals ORDER BY id"))?;
        let goals = stmt
            .query_map([], row_to_goal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>, DatabaseError> {
        let goal = self
            .conn
            .query_row(
                &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
                params![id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    pub fn update_goal(&self, goal: &Goal) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE goals SET title = ?1, why = ?2, kgi = ?3, deadline = ?4, area = ?5
             WHERE id = ?6",
            params![
                goal.title,
                goal.why,
                goal.kgi,
                goal.deadline.map(|d| d.to_string()),
                goal.area,
                goal.id,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "goal",
                id: goal.id,
            });
        }
        Ok(())
    }

    /// Delete a goal and, through the cascade, all of its tasks.
    pub fn delete_goal(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { entity: "goal", id });
        }
        Ok(())
    }

    // === Tasks ===

    pub fn insert_task(&self, goal_id: i64, draft: &TaskDraft) -> Result<Task, DatabaseError> {
        if self.get_goal(goal_id)?.is_none() {
            return Err(DatabaseError::NotFound {
                entity: "goal",
                id: goal_id,
            });
        }
        self.conn.execute(
            "INSERT INTO tasks (goal_id, title, status, impact, effort_min, due, parent_task_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal_id,
                draft.title,
                draft.status.as_str(),
                draft.impact,
                draft.effort_min,
                draft.due.map(|d| d.to_string()),
                draft.parent_task_id,
            ],
        )?;
        Ok(Task {
            id: self.conn.last_insert_rowid(),
            goal_id,
            title: draft.title.clone(),
            status: draft.status,
            impact: draft.impact,
            effort_min: draft.effort_min,
            due: draft.due,
            parent_task_id: draft.parent_task_id,
        })
    }

    /// Tasks, optionally restricted to one goal, ordered by id.
    pub fn list_tasks(&self, goal_id: Option<i64>) -> Result<Vec<Task>, DatabaseError> {
        let tasks = match goal_id {
            Some(gid) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE goal_id = ?1 ORDER BY id"
                ))?;
                let rows = stmt.query_map(params![gid], row_to_task)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))?;
                let rows = stmt.query_map([], row_to_task)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(tasks)
    }

    /// All tasks not yet done, in id order. This is the planner's input.
    pub fn open_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status != 'done' ORDER BY id"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?1, status = ?2, impact = ?3, effort_min = ?4,
             due = ?5, parent_task_id = ?6 WHERE id = ?7",
            params![
                task.title,
                task.status.as_str(),
                task.impact,
                task.effort_min,
                task.due.map(|d| d.to_string()),
                task.parent_task_id,
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "task",
                id: task.id,
            });
        }
        Ok(())
    }

    pub fn delete_task(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    /// Save WBS items as pending tasks under a goal, skipping titles the
    /// goal already has. Returns the number of tasks created.
    pub fn save_wbs_tasks(&self, goal_id: i64, items: &[WbsTask]) -> Result<usize, DatabaseError> {
        let mut existing: std::collections::HashSet<String> = {
            let mut stmt = self
                .conn
                .prepare("SELECT title FROM tasks WHERE goal_id = ?1")?;
            let titles = stmt.query_map(params![goal_id], |row| row.get::<_, String>(0))?;
            titles
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|t| t.trim().to_string())
                .collect()
        };

        let mut count = 0;
        for item in items {
            let title = item.title.trim().to_string();
            if title.is_empty() || existing.contains(&title) {
                continue;
            }
            self.conn.execute(
                "INSERT INTO tasks (goal_id, title, status, impact, effort_min, due, parent_task_id)
                 VALUES (?1, ?2, 'pending', ?3, ?4, ?5, NULL)",
                params![
                    goal_id,
                    title,
                    item.impact,
                    item.effort_min,
                    item.due.map(|d| d.to_string()),
                ],
            )?;
            existing.insert(title);
            count += 1;
        }
        Ok(count)
    }

    // === Reflections ===

    pub fn insert_reflection(
        &self,
        draft: &ReflectionDraft,
        default_date: NaiveDate,
    ) -> Result<Reflection, DatabaseError> {
        let date = draft.date.unwrap_or(default_date);
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO reflections (date, text, mood, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                date.to_string(),
                draft.text,
                draft.mood,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(Reflection {
            id: self.conn.last_insert_rowid(),
            date,
            text: draft.text.clone(),
            mood: draft.mood,
            created_at,
        })
    }

    /// Reflections dated `start` or later, newest first.
    pub fn reflections_since(&self, start: NaiveDate) -> Result<Vec<Reflection>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, text, mood, created_at FROM reflections
             WHERE date >= ?1 ORDER BY date DESC, id DESC",
        )?;
        let notes = stmt
            .query_map(params![start.to_string()], row_to_reflection)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    // === Suggestions ===

    pub fn insert_suggestion(
        &self,
        date: NaiveDate,
        kind: &str,
        content_json: &str,
    ) -> Result<Suggestion, DatabaseError> {
        self.conn.execute(
            "INSERT INTO suggestions (date, kind, content_json) VALUES (?1, ?2, ?3)",
            params![date.to_string(), kind, content_json],
        )?;
        Ok(Suggestion {
            id: self.conn.last_insert_rowid(),
            date,
            kind: kind.to_string(),
            content_json: content_json.to_string(),
        })
    }

    pub fn update_suggestion(
        &self,
        id: i64,
        date: NaiveDate,
        content_json: &str,
    ) -> Result<Suggestion, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE suggestions SET date = ?1, content_json = ?2 WHERE id = ?3",
            params![date.to_string(), content_json, id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "suggestion",
                id,
            });
        }
        self.conn.query_row(
            "SELECT id, date, kind, content_json FROM suggestions WHERE id = ?1",
            params![id],
            row_to_suggestion,
        )
        .map_err(DatabaseError::from)
    }

    /// Most recent suggestion of `kind` dated within `[start, end]`.
    pub fn find_suggestion_in_range(
        &self,
        kind: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Suggestion>, DatabaseError> {
        let sug = self
            .conn
            .query_row(
                "SELECT id, date, kind, content_json FROM suggestions
                 WHERE kind = ?1 AND date >= ?2 AND date <= ?3
                 ORDER BY id DESC LIMIT 1",
                params![kind, start.to_string(), end.to_string()],
                row_to_suggestion,
            )
            .optional()?;
        Ok(sug)
    }

    pub fn latest_suggestion(&self, kind: &str) -> Result<Option<Suggestion>, DatabaseError> {
        let sug = self
            .conn
            .query_row(
                "SELECT id, date, kind, content_json FROM suggestions
                 WHERE kind = ?1 ORDER BY id DESC LIMIT 1",
                params![kind],
                row_to_suggestion,
            )
            .optional()?;
        Ok(sug)
    }

    // === Integrations ===

    pub fn integration_set(&self, kind: &str, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO integrations (kind, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (kind, key) DO UPDATE SET value = excluded.value",
            params![kind, key, value],
        )?;
        Ok(())
    }

    pub fn integration_get(&self, kind: &str, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM integrations WHERE kind = ?1 AND key = ?2",
                params![kind, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}
