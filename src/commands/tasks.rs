//! Handlers for the five task commands.

use super::{get_i64, get_str, require_i64, require_object};
use crate::dates::parse_due;
use crate::db::Database;
use crate::error::{CommandError, CommandResult};
use crate::types::{NewTask, Priority, Status, TaskPatch};
use serde_json::{json, Map, Value};

/// Coerce a wire value into a priority. Accepts the integer codes 1..=3 and
/// the names "low"/"normal"/"high".
fn priority_from_value(value: &Value) -> CommandResult<Priority> {
    match value {
        Value::Number(_) => value
            .as_i64()
            .and_then(Priority::from_i64)
            .ok_or_else(|| CommandError::invalid_value("priority", format!("invalid priority: {}", value))),
        Value::String(s) => Priority::from_name(s)
            .ok_or_else(|| CommandError::invalid_value("priority", format!("invalid priority: '{}'", s))),
        _ => Err(CommandError::invalid_value(
            "priority",
            "priority must be 1-3 or low/normal/high",
        )),
    }
}

fn status_from_value(value: &Value) -> CommandResult<Status> {
    value
        .as_str()
        .and_then(Status::from_str)
        .ok_or_else(|| CommandError::invalid_value("status", format!("invalid status: {}", value)))
}

/// Build a patch from the wire `fields` object. Any key outside the allowed
/// set fails the whole update before storage is touched.
fn patch_from_fields(fields: &Map<String, Value>) -> CommandResult<TaskPatch> {
    let mut patch = TaskPatch::default();

    for (key, value) in fields {
        match key.as_str() {
            "title" => {
                let title = value
                    .as_str()
                    .ok_or_else(|| CommandError::invalid_value("title", "title must be a string"))?;
                if title.trim().is_empty() {
                    return Err(CommandError::invalid_value("title", "title must not be empty"));
                }
                patch.title = Some(title.to_string());
            }
            "description" => {
                let description = value.as_str().ok_or_else(|| {
                    CommandError::invalid_value("description", "description must be a string")
                })?;
                patch.description = Some(description.to_string());
            }
            "due_at" => {
                patch.due_at = Some(match value {
                    Value::Null => None,
                    Value::String(s) => parse_due(Some(s))?,
                    _ => {
                        return Err(CommandError::invalid_value(
                            "due_at",
                            "due_at must be a string or null",
                        ))
                    }
                });
            }
            "estimate_min" => {
                let estimate = value.as_i64().ok_or_else(|| {
                    CommandError::invalid_value("estimate_min", "estimate_min must be an integer")
                })?;
                patch.estimate_min = Some(estimate);
            }
            "priority" => patch.priority = Some(priority_from_value(value)?),
            "status" => patch.status = Some(status_from_value(value)?),
            "parent_id" => {
                patch.parent_id = Some(match value {
                    Value::Null => None,
                    _ => Some(value.as_i64().ok_or_else(|| {
                        CommandError::invalid_value("parent_id", "parent_id must be an integer")
                    })?),
                });
            }
            other => return Err(CommandError::unknown_field(other)),
        }
    }

    Ok(patch)
}

pub fn add(db: &Database, args: &Value) -> CommandResult<Value> {
    let title = get_str(args, "title").ok_or_else(|| CommandError::missing_field("title"))?;
    if title.trim().is_empty() {
        return Err(CommandError::invalid_value("title", "title must not be empty"));
    }

    let due_at = parse_due(get_str(args, "due_at"))?;
    let priority = match args.get("priority") {
        None | Some(Value::Null) => Priority::default(),
        Some(value) => priority_from_value(value)?,
    };

    let id = db.add_task(NewTask {
        title: title.to_string(),
        description: get_str(args, "description").unwrap_or_default().to_string(),
        due_at,
        estimate_min: get_i64(args, "estimate_min").unwrap_or(0),
        priority,
        parent_id: get_i64(args, "parent_id"),
    })?;

    Ok(json!({ "id": id }))
}

pub fn update(db: &Database, args: &Value) -> CommandResult<Value> {
    let id = require_i64(args, "id")?;
    let fields = require_object(args, "fields")?;
    let patch = patch_from_fields(fields)?;

    // An empty patch still refreshes updated_at, and an id matching no row
    // is reported here, not by the store.
    let affected = db.update_task(id, patch)?;
    if affected == 0 {
        return Err(CommandError::task_not_found(id));
    }

    Ok(json!({}))
}

pub fn delete(db: &Database, args: &Value) -> CommandResult<Value> {
    let id = require_i64(args, "id")?;
    db.delete_task(id)?;
    Ok(json!({}))
}

pub fn show(db: &Database, args: &Value) -> CommandResult<Value> {
    let id = require_i64(args, "id")?;
    let task = db.get_task(id)?.ok_or_else(|| CommandError::task_not_found(id))?;
    Ok(json!({ "task": task }))
}

pub fn list(db: &Database, args: &Value) -> CommandResult<Value> {
    let parent = match args.get("parent_id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_i64().ok_or_else(|| {
            CommandError::invalid_value("parent_id", "parent_id must be an integer")
        })?),
    };

    let tasks = db.list_tasks(parent)?;
    Ok(json!({ "tasks": tasks }))
}
