//! Command-dispatch protocol.
//!
//! A payload is a JSON object with a `command` field plus command-specific
//! fields. Dispatch always produces a uniform envelope: `{"status":"ok",..}`
//! on success, `{"status":"error","error":".."}` on any failure. No error
//! raised below this boundary escapes to the caller.

pub mod tasks;

use crate::db::Database;
use crate::error::{CommandError, CommandResult};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Stateless command handler; one dispatch per invocation.
pub struct CommandHandler {
    db: Database,
}

impl CommandHandler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Dispatch a command payload by name.
    ///
    /// An unknown command is rejected before any storage access.
    pub fn dispatch(&self, payload: &Value) -> Value {
        let command = payload.get("command").and_then(Value::as_str);
        debug!(command = command.unwrap_or("<missing>"), "dispatching");

        let result = match command {
            Some("add") => tasks::add(&self.db, payload),
            Some("update") => tasks::update(&self.db, payload),
            Some("delete") => tasks::delete(&self.db, payload),
            Some("show") => tasks::show(&self.db, payload),
            Some("list") => tasks::list(&self.db, payload),
            _ => Err(CommandError::unknown_command()),
        };

        match result {
            Ok(Value::Object(mut body)) => {
                body.insert("status".to_string(), json!("ok"));
                Value::Object(body)
            }
            // Handlers always return objects; anything else is a bug.
            Ok(other) => json!({ "status": "ok", "result": other }),
            Err(err) => {
                debug!(error = %err, "command failed");
                json!({ "status": "error", "error": err.to_string() })
            }
        }
    }
}

// Typed accessors over the untyped payload.

pub(crate) fn get_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

pub(crate) fn get_i64(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

/// Require an integer field, distinguishing "missing" from "wrong type".
pub(crate) fn require_i64(args: &Value, key: &str) -> CommandResult<i64> {
    match args.get(key) {
        None | Some(Value::Null) => Err(CommandError::missing_field(key)),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| CommandError::invalid_value(key, format!("{} must be an integer", key))),
    }
}

pub(crate) fn require_object<'a>(
    args: &'a Value,
    key: &str,
) -> CommandResult<&'a Map<String, Value>> {
    match args.get(key) {
        None | Some(Value::Null) => Err(CommandError::missing_field(key)),
        Some(value) => value
            .as_object()
            .ok_or_else(|| CommandError::invalid_value(key, format!("{} must be an object", key))),
    }
}
