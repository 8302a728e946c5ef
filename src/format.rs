//! Plain-text rendering of tasks for the interactive shell.

use crate::db::TIMESTAMP_FORMAT;
use crate::types::Task;

/// Render a single task as two indented lines.
pub fn format_task(task: &Task, indent: &str) -> String {
    let due = task
        .due_at
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "none".to_string());
    let description = if task.description.is_empty() {
        String::new()
    } else {
        format!(" - {}", task.description)
    };

    format!(
        "{indent}[{}] {} ({})\n{indent}  Prio: {}, Due: {}, Est: {}min{}",
        task.id,
        task.title,
        task.status.as_str(),
        task.priority.as_str(),
        due,
        task.estimate_min,
        description,
    )
}
