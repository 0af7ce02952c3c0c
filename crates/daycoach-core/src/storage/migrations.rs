//! Database schema migrations for daycoach.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current version, 0 for a fresh database.
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: goals, tasks, reflections, suggestions, integrations.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS goals (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            why         TEXT NOT NULL DEFAULT '',
            kgi         TEXT NOT NULL DEFAULT '',
            deadline    TEXT,
            area        TEXT NOT NULL DEFAULT 'general',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            goal_id        INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
            title          TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'pending',
            impact         INTEGER NOT NULL DEFAULT 1,
            effort_min     INTEGER NOT NULL DEFAULT 30,
            due            TEXT,
            parent_task_id INTEGER
        );

        CREATE TABLE IF NOT EXISTS reflections (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            text        TEXT NOT NULL DEFAULT '',
            mood        INTEGER NOT NULL DEFAULT 3,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS suggestions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL,
            kind         TEXT NOT NULL,
            content_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS integrations (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            kind  TEXT NOT NULL,
            key   TEXT NOT NULL DEFAULT 'default',
            value TEXT NOT NULL,
            UNIQUE (kind, key)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_goal_id ON tasks(goal_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
        CREATE INDEX IF NOT EXISTS idx_reflections_date ON reflections(date);
        CREATE INDEX IF NOT EXISTS idx_suggestions_kind_date ON suggestions(kind, date);",
    )?;
    set_schema_version(conn, 1)
}
