//! `donezo list` command implementation

use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::task::{pending_tasks, Task};

const TABLE_COL_ID: usize = 6;
const TABLE_COL_TASK: usize = 36;
const TABLE_COL_DEADLINE: usize = 18;
const TABLE_COL_PHONE: usize = 16;

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Include tasks that were already notified
    #[arg(long)]
    all: bool,
}

fn print_table_header(with_status: bool) {
    println!(
        "{:<width_id$} {:<width_task$} {:<width_deadline$} {:<width_phone$}{}",
        "ID",
        "TASK",
        "DEADLINE",
        "PHONE",
        if with_status { " STATUS" } else { "" },
        width_id = TABLE_COL_ID,
        width_task = TABLE_COL_TASK,
        width_deadline = TABLE_COL_DEADLINE,
        width_phone = TABLE_COL_PHONE
    );
    println!(
        "{}",
        "-".repeat(
            TABLE_COL_ID
                + TABLE_COL_TASK
                + TABLE_COL_DEADLINE
                + TABLE_COL_PHONE
                + 3
                + if with_status { 7 } else { 0 }
        )
    );
}

fn print_table_row(task: &Task, with_status: bool) {
    let status = match (with_status, task.done) {
        (false, _) => "",
        (true, true) => " done",
        (true, false) => " pending",
    };
    println!(
        "{:<width_id$} {:<width_task$} {:<width_deadline$} {:<width_phone$}{}",
        task.id.to_string(),
        super::truncate(&task.description, TABLE_COL_TASK),
        task.deadline,
        super::truncate(&task.destination, TABLE_COL_PHONE),
        status,
        width_id = TABLE_COL_ID,
        width_task = TABLE_COL_TASK,
        width_deadline = TABLE_COL_DEADLINE,
        width_phone = TABLE_COL_PHONE
    );
}

pub async fn run(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let tasks = if args.all {
        ctx.store.call(|store| store.list_all()).await?
    } else {
        ctx.store.call(|store| pending_tasks(store)).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        if args.all {
            println!("No tasks recorded yet.");
        } else {
            println!("No pending tasks.");
        }
        return Ok(());
    }

    print_table_header(args.all);
    for task in &tasks {
        print_table_row(task, args.all);
    }
    println!("\nTotal: {} tasks", tasks.len());

    Ok(())
}
