// UI layer: console rendering for the listing and detail views. Every
// function writes to a caller-supplied `io::Write` so the output can be
// captured; the binary passes stdout.

use crate::api::Transport;
use crate::error::Result;
use crate::snapshot::{write_snapshot, TaskSnapshot};
use crate::tasks::{Task, TaskComment, TaskDetail, TaskService};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Listing mode: fetch, persist the snapshot, then print every task.
pub fn show_tasks<T: Transport>(
    service: &TaskService<'_, T>,
    snapshot_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let listing = with_spinner("Fetching tasks...", || service.fetch_listing())?;

    writeln!(out, "{}", format!("Found {} open task(s):", listing.tasks.len()).cyan())?;

    let now = chrono::Utc::now().timestamp();
    write_snapshot(snapshot_path, &TaskSnapshot::new(&listing.raw, now))?;

    render_tasks(out, &listing.tasks)?;
    Ok(())
}

/// Detail mode: resolve `index` (1-based) and print the task with its comments.
pub fn show_task_detail<T: Transport>(
    service: &TaskService<'_, T>,
    index: i64,
    out: &mut impl Write,
) -> Result<()> {
    let detail = with_spinner("Fetching task...", || service.task_detail(index))?;
    render_detail(out, &detail)?;
    Ok(())
}

/// Print the comments of a task addressed by its API id.
pub fn show_comments<T: Transport>(
    service: &TaskService<'_, T>,
    task_id: i64,
    out: &mut impl Write,
) -> Result<()> {
    let comments = with_spinner("Fetching comments...", || service.fetch_comments(task_id))?;
    writeln!(out, "{}", format!("Task Comment Details ({task_id}):").cyan())?;
    render_comments(out, &comments)?;
    Ok(())
}

pub fn render_tasks(out: &mut impl Write, tasks: &[Task]) -> std::io::Result<()> {
    for task in tasks {
        writeln!(out, "{}", "Task Details:".cyan())?;
        writeln!(out, "{}", format!("Task ID: {}", task.id).green())?;
        writeln!(out, "{}", format!("Task Name: {}", task.name).green())?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn render_detail(out: &mut impl Write, detail: &TaskDetail) -> std::io::Result<()> {
    let task = &detail.task;
    writeln!(out, "{}", "Task Details:".cyan())?;
    writeln!(out, "{}", format!("Task ID: {}", task.id).green())?;
    writeln!(out, "{}", format!("Task Name: {}", task.name).green())?;
    writeln!(out, "{}", format!("Section: {}", task.section_name).green())?;
    writeln!(out)?;
    writeln!(out, "{}", format!("Comments ({}):", detail.comments.len()).cyan())?;
    render_comments(out, &detail.comments)
}

fn render_comments(out: &mut impl Write, comments: &[TaskComment]) -> std::io::Result<()> {
    for comment in comments {
        writeln!(out, "{}", format!("Comment: {}", comment.text).green())?;
        writeln!(out)?;
    }
    Ok(())
}

/// Run `f` while a spinner ticks on stderr. The spinner stays hidden when
/// stderr is not a terminal.
fn with_spinner<R>(msg: &'static str, f: impl FnOnce() -> Result<R>) -> Result<R> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}
