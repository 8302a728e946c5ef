//! Structured error types for command responses.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,
    InvalidDate,
    UnknownField,

    // Not found
    TaskNotFound,

    // Storage errors
    DatabaseError,

    // Protocol errors
    UnknownCommand,

    InternalError,
}

/// Structured error for command responses.
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn invalid_date(text: &str) -> Self {
        Self::new(
            ErrorCode::InvalidDate,
            format!("Unrecognized date/time format: '{}'", text),
        )
        .with_field("due_at")
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(ErrorCode::UnknownField, format!("Unknown field: {}", field))
            .with_field(field)
    }

    pub fn task_not_found(task_id: i64) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }

    pub fn unknown_command() -> Self {
        Self::new(ErrorCode::UnknownCommand, "unknown command")
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to CommandError first
        match err.downcast::<CommandError>() {
            Ok(cmd_err) => cmd_err,
            Err(err) => match err.downcast::<rusqlite::Error>() {
                Ok(db_err) => CommandError::database(db_err),
                Err(err) => CommandError::internal(err),
            },
        }
    }
}

impl From<rusqlite::Error> for CommandError {
    fn from(err: rusqlite::Error) -> Self {
        CommandError::database(err)
    }
}

/// Result type for command operations.
pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let err = CommandError::missing_field("title");
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.field.as_deref(), Some("title"));
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn anyhow_round_trip_preserves_command_error() {
        let inner = CommandError::task_not_found(42);
        let any: anyhow::Error = inner.into();
        let back: CommandError = any.into();
        assert_eq!(back.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn anyhow_sqlite_error_maps_to_database() {
        let any: anyhow::Error = rusqlite::Error::QueryReturnedNoRows.into();
        let err: CommandError = any.into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
