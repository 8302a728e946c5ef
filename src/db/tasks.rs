//! Task CRUD and hierarchy-aware listing.

use super::{now, ts_from_text, ts_to_text, Database};
use crate::error::CommandError;
use crate::types::{NewTask, Priority, Status, Task, TaskPatch};
use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};
use tracing::debug;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get("id")?;
    let parent_id: Option<i64> = row.get("parent_id")?;
    let title: String = row.get("title")?;
    let description: String = row.get("description")?;
    let due_at_text: Option<String> = row.get("due_at")?;
    let estimate_min: i64 = row.get("estimate_min")?;
    let priority: i64 = row.get("priority")?;
    let status: String = row.get("status")?;
    let created_at_text: String = row.get("created_at")?;
    let updated_at_text: String = row.get("updated_at")?;

    let text_err = |e: anyhow::Error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into())
    };

    // The CHECK constraints make these conversions infallible for rows the
    // store itself wrote; bad codes mean the file was edited out-of-band.
    let priority = Priority::from_i64(priority).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(0, priority)
    })?;
    let status = Status::from_str(&status)
        .ok_or_else(|| text_err(anyhow::anyhow!("invalid status code: {}", status)))?;

    let due_at = match due_at_text {
        Some(text) => Some(ts_from_text(&text).map_err(text_err)?),
        None => None,
    };
    let created_at = ts_from_text(&created_at_text).map_err(text_err)?;
    let updated_at = ts_from_text(&updated_at_text).map_err(text_err)?;

    Ok(Task {
        id,
        parent_id,
        title,
        description,
        due_at,
        estimate_min,
        priority,
        status,
        created_at,
        updated_at,
    })
}

/// Walk the ancestor chain upward from `start`, returning true if it passes
/// through `needle`. Used to keep re-parenting from creating a cycle.
fn is_ancestor(conn: &Connection, needle: i64, start: i64) -> Result<bool> {
    let mut current = Some(start);
    while let Some(id) = current {
        if id == needle {
            return Ok(true);
        }
        let parent: Option<Option<i64>> = conn
            .query_row(
                "SELECT parent_id FROM tasks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })?;
        current = parent.flatten();
    }
    Ok(false)
}

impl Database {
    /// Create a new task and return its id.
    ///
    /// A `parent_id` that does not reference an existing task is rejected by
    /// the foreign key and surfaces as a database error.
    pub fn add_task(&self, input: NewTask) -> Result<i64> {
        let ts = ts_to_text(now());

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO tasks (
                    parent_id, title, description, due_at,
                    estimate_min, priority, status, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    input.parent_id,
                    input.title,
                    input.description,
                    input.due_at.map(ts_to_text),
                    input.estimate_min,
                    input.priority.as_i64(),
                    Status::Todo.as_str(),
                    ts,
                    ts,
                ],
            )?;

            let id = tx.last_insert_rowid();
            tx.commit()?;

            debug!(task_id = id, "task created");
            Ok(id)
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

            let result = stmt.query_row(params![task_id], parse_task_row);

            match result {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List root tasks (`parent` absent) or the direct children of `parent`.
    ///
    /// Non-recursive; callers wanting a subtree list again per child.
    /// Ordering contract: priority descending, then due date ascending with
    /// missing due dates last. Ties beyond that are unspecified.
    pub fn list_tasks(&self, parent: Option<i64>) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let order = "ORDER BY priority DESC, due_at ASC NULLS LAST";

            let tasks = match parent {
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT * FROM tasks WHERE parent_id IS NULL {}",
                        order
                    ))?;
                    let rows = stmt.query_map([], parse_task_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                Some(parent_id) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT * FROM tasks WHERE parent_id = ?1 {}",
                        order
                    ))?;
                    let rows = stmt.query_map(params![parent_id], parse_task_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };

            Ok(tasks)
        })
    }

    /// Apply a partial update and return the number of rows affected.
    ///
    /// `updated_at` is refreshed unconditionally, even for an empty patch.
    /// Zero rows affected is not an error at this layer; the dispatcher maps
    /// it to a not-found response.
    pub fn update_task(&self, task_id: i64, patch: TaskPatch) -> Result<usize> {
        let ts = ts_to_text(now());

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if let Some(new_parent) = patch.parent_id.flatten() {
                if new_parent == task_id || is_ancestor(&tx, task_id, new_parent)? {
                    return Err(CommandError::invalid_value(
                        "parent_id",
                        format!("parent {} would create a cycle", new_parent),
                    )
                    .into());
                }
            }

            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Box<dyn ToSql>> = Vec::new();

            if let Some(title) = patch.title {
                sets.push("title = ?");
                values.push(Box::new(title));
            }
            if let Some(description) = patch.description {
                sets.push("description = ?");
                values.push(Box::new(description));
            }
            if let Some(due_at) = patch.due_at {
                sets.push("due_at = ?");
                values.push(Box::new(due_at.map(ts_to_text)));
            }
            if let Some(estimate_min) = patch.estimate_min {
                sets.push("estimate_min = ?");
                values.push(Box::new(estimate_min));
            }
            if let Some(priority) = patch.priority {
                sets.push("priority = ?");
                values.push(Box::new(priority.as_i64()));
            }
            if let Some(status) = patch.status {
                sets.push("status = ?");
                values.push(Box::new(status.as_str()));
            }
            if let Some(parent_id) = patch.parent_id {
                sets.push("parent_id = ?");
                values.push(Box::new(parent_id));
            }

            sets.push("updated_at = ?");
            values.push(Box::new(ts));
            values.push(Box::new(task_id));

            let sql = format!(
                "UPDATE tasks SET {} WHERE id = ?",
                sets.join(", ")
            );
            let affected =
                tx.execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;

            tx.commit()?;

            debug!(task_id, affected, "task updated");
            Ok(affected)
        })
    }

    /// Delete a task and its entire subtree (FK cascade).
    ///
    /// Deleting a missing id is a no-op.
    pub fn delete_task(&self, task_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let affected = tx.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            tx.commit()?;

            debug!(task_id, affected, "task deleted");
            Ok(())
        })
    }
}
