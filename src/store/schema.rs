//! SQLite DDL for the task store.

use rusqlite::Connection;

/// Stamped into `PRAGMA user_version` on open.
pub const SCHEMA_VERSION: u32 = 1;

/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
/// Column names and types match databases written by earlier releases.
pub(crate) const SCHEMA_SQL: &str = r#"
-- WAL lets the background scheduler read while the shell writes.
-- In-memory databases keep their "memory" journal, which is fine.
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tasks (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    task     TEXT NOT NULL,
    deadline TEXT NOT NULL,
    phone    TEXT NOT NULL,
    done     INTEGER DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_done ON tasks(done);
"#;

pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}
