//! Pending-task listing for display

use super::Task;
use crate::error::Result;
use crate::store::TaskStore;

pub fn pending_tasks(store: &TaskStore) -> Result<Vec<Task>> {
    store.list_pending()
}

/// Render the pending list the way the interactive shell shows it.
pub fn format_pending(tasks: &[Task]) -> String {
    let mut out = String::from("📋 Pending Tasks:");
    if tasks.is_empty() {
        out.push_str("\n(none)");
    }
    for task in tasks {
        out.push('\n');
        out.push_str(&task.to_display_line());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{add_task, NewTask};

    #[test]
    fn test_pending_tasks_excludes_done() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        let a = add_task(&store, &NewTask::new("a", "2026-03-01 09:00", "1"))?;
        add_task(&store, &NewTask::new("b", "2026-03-01 10:00", "2"))?;
        store.mark_done(a)?;

        let pending = pending_tasks(&store)?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].description, "b");
        Ok(())
    }

    #[test]
    fn test_format_pending() -> Result<()> {
        let store = TaskStore::open_in_memory()?;
        add_task(&store, &NewTask::new("Buy milk", "2026-03-01 09:00", "+1555"))?;

        let text = format_pending(&pending_tasks(&store)?);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "📋 Pending Tasks:");
        assert_eq!(
            lines[1],
            "ID: 1, Task: Buy milk, Deadline: 2026-03-01 09:00, Phone: +1555"
        );
        Ok(())
    }

    #[test]
    fn test_format_pending_empty() {
        assert_eq!(format_pending(&[]), "📋 Pending Tasks:\n(none)");
    }
}
