//! SQLite-backed task store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::schema::apply_schema;
use crate::error::{Result, TaskError, ValidationError};
use crate::task::{parse_deadline, Task, TaskId};

/// Database filename within the app directory.
pub const DB_FILENAME: &str = "tasks.db";

/// How long a write waits for another process (e.g. `donezo run`) holding the file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, task, deadline, phone, done FROM tasks";

/// Shared handle to the `tasks` table.
///
/// Thread-safe via an internal `Mutex<Connection>`. Each operation holds the
/// lock for a single autocommitted statement, so it is either fully applied
/// and on disk when it returns, or not applied at all.
pub struct TaskStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl TaskStore {
    /// Open (or create) the database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_schema(&conn)?;
        debug!("opened task store at {}", path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` against the store on tokio's blocking pool.
    ///
    /// Async callers go through here: a write can sit in `busy_timeout`
    /// while another process holds the file.
    pub async fn call<T, F>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(&TaskStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| TaskError::LockPoisoned)
    }

    /// Insert a pending task and return its new id.
    ///
    /// Rejects empty fields and deadlines not in `YYYY-MM-DD HH:MM` form, so
    /// nothing unparsable is written through this path.
    pub fn insert(&self, description: &str, deadline: &str, destination: &str) -> Result<TaskId> {
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        if destination.trim().is_empty() {
            return Err(ValidationError::EmptyDestination.into());
        }
        parse_deadline(deadline)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tasks (task, deadline, phone) VALUES (?1, ?2, ?3)",
            params![description, deadline, destination],
        )?;
        let id = TaskId(conn.last_insert_rowid());
        debug!("inserted task {} due {}", id, deadline);
        Ok(id)
    }

    /// Tasks with `done = 0`, in insertion order.
    pub fn list_pending(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("{SELECT_COLUMNS} WHERE done = 0 ORDER BY id"))
    }

    /// Every task ever recorded, pending and done, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("{SELECT_COLUMNS} ORDER BY id"))
    }

    pub fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let conn = self.lock()?;
        let task = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.0],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Flip `done` to true. Marking an already-done task again is a no-op.
    pub fn mark_done(&self, id: TaskId) -> Result<()> {
        let conn = self.lock()?;
        // SQLite counts matched rows, so an already-done task still reports 1.
        let changed = conn.execute("UPDATE tasks SET done = 1 WHERE id = ?1", params![id.0])?;
        if changed == 0 {
            return Err(TaskError::NotFound(id));
        }
        debug!("marked task {} done", id);
        Ok(())
    }

    fn query_tasks(&self, sql: &str) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], row_to_task)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Write a row without validation. Only for exercising legacy/corrupt data.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, description: &str, deadline: &str, destination: &str) -> TaskId {
        let conn = self.lock().unwrap();
        conn.execute(
            "INSERT INTO tasks (task, deadline, phone) VALUES (?1, ?2, ?3)",
            params![description, deadline, destination],
        )
        .unwrap();
        TaskId(conn.last_insert_rowid())
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let done: Option<i64> = row.get(4)?;
    Ok(Task {
        id: TaskId(row.get(0)?),
        description: row.get(1)?,
        deadline: row.get(2)?,
        destination: row.get(3)?,
        done: done.unwrap_or(0) != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_call_keeps_runtime_responsive_while_store_is_busy() -> Result<()> {
        let store = Arc::new(TaskStore::open_in_memory()?);
        let start = std::time::Instant::now();

        let held = store.call(|s| {
            let _conn = s.lock()?;
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        });
        let other = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            start.elapsed()
        };

        let (held, other_done_after) = tokio::join!(held, other);
        held?;
        assert!(other_done_after < Duration::from_millis(250));
        Ok(())
    }

    #[tokio::test]
    async fn test_call_returns_store_result() -> Result<()> {
        let store = Arc::new(TaskStore::open_in_memory()?);
        let id = store
            .call(|s| s.insert("Water plants", "2026-03-01 08:00", "+1"))
            .await?;
        let pending = store.call(|s| s.list_pending()).await?;
        assert_eq!(pending[0].id, id);

        let err = store.call(|s| s.mark_done(TaskId(999))).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(TaskId(999))));
        Ok(())
    }

    #[test]
    fn test_insert_then_list_pending() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let id = store.insert("Call mom", "2026-03-01 18:00", "+15550000")?;

        let pending = store.list_pending()?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
        assert_eq!(pending[0].description, "Call mom");
        assert_eq!(pending[0].deadline, "2026-03-01 18:00");
        assert_eq!(pending[0].destination, "+15550000");
        assert!(!pending[0].done);
        Ok(())
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DB_FILENAME);

        let first = {
            let store = TaskStore::open(&path)?;
            let a = store.insert("a", "2026-03-01 18:00", "1")?;
            let b = store.insert("b", "2026-03-01 18:00", "1")?;
            assert!(b > a);
            b
        };

        // Delete the newest row behind the store's back; AUTOINCREMENT must
        // still hand out a fresh id.
        {
            let conn = Connection::open(&path)?;
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![first.0])?;
        }

        let store = TaskStore::open(&path)?;
        let next = store.insert("c", "2026-03-01 18:00", "1")?;
        assert!(next > first);
        Ok(())
    }

    #[test]
    fn test_insert_rejects_invalid_input() -> Result<()> {
        let store = TaskStore::open_in_memory()?;

        let err = store.insert("x", "not-a-date", "555").unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::InvalidDeadline { .. })
        ));

        let err = store.insert("   ", "2026-03-01 18:00", "555").unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::EmptyDescription)
        ));

        let err = store.insert("x", "2026-03-01 18:00", "").unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::EmptyDestination)
        ));

        assert!(store.list_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_mark_done_removes_from_pending() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let a = store.insert("a", "2026-03-01 18:00", "1")?;
        let b = store.insert("b", "2026-03-01 18:00", "1")?;

        store.mark_done(a)?;

        let pending: Vec<TaskId> = store.list_pending()?.iter().map(|t| t.id).collect();
        assert_eq!(pending, vec![b]);
        assert!(store.get(a)?.unwrap().done);
        assert_eq!(store.list_all()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_mark_done_is_idempotent() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let id = store.insert("a", "2026-03-01 18:00", "1")?;

        store.mark_done(id)?;
        let once = store.list_all()?;
        store.mark_done(id)?;
        let twice = store.list_all()?;

        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_mark_done_unknown_id() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let err = store.mark_done(TaskId(99)).unwrap_err();
        assert!(matches!(err, TaskError::NotFound(TaskId(99))));
        Ok(())
    }

    #[test]
    fn test_get_missing_returns_none() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        assert!(store.get(TaskId(1))?.is_none());
        Ok(())
    }

    #[test]
    fn test_state_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(DB_FILENAME);

        let id = {
            let store = TaskStore::open(&path)?;
            let id = store.insert("persist me", "2026-03-01 18:00", "+1")?;
            store.insert("still pending", "2026-03-02 18:00", "+1")?;
            store.mark_done(id)?;
            id
        };

        let store = TaskStore::open(&path)?;
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(store.get(id)?.unwrap().done);
        assert_eq!(store.list_pending()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_reads_rows_written_by_older_releases() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DB_FILENAME);
        {
            let conn = Connection::open(&path)?;
            conn.execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task TEXT NOT NULL,
                    deadline TEXT NOT NULL,
                    phone TEXT NOT NULL,
                    done INTEGER DEFAULT 0
                );
                INSERT INTO tasks (task, deadline, phone) VALUES ('old', '2024-05-01 08:00', '+44');
                INSERT INTO tasks (task, deadline, phone, done) VALUES ('older', '2024-04-01 08:00', '+44', 1);",
            )?;
        }

        let store = TaskStore::open(&path)?;
        let pending = store.list_pending()?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].description, "old");
        Ok(())
    }

    #[test]
    fn test_concurrent_inserts_from_threads() -> Result<()> {
        let store = Arc::new(TaskStore::open_in_memory()?);
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .insert(&format!("t{n}-{i}"), "2026-03-01 18:00", "+1")
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.list_all()?;
        assert_eq!(all.len(), 40);
        let mut ids: Vec<i64> = all.iter().map(|t| t.id.0).collect();
        ids.dedup();
        assert_eq!(ids.len(), 40);
        Ok(())
    }
}
