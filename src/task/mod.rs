//! Task records and the foreground APIs over them
//!
//! - `model`: the task record and deadline format
//! - `entry`: validate raw input and insert a task
//! - `view`: list pending tasks for display

pub mod entry;
pub mod model;
pub mod view;

pub use entry::{add_task, NewTask};
pub use model::{parse_deadline, Task, TaskId, DEADLINE_FORMAT};
pub use view::{format_pending, pending_tasks};
