//! Core domain types for taskbook.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Task priority. Stored as its integer code (1..=3) and serialized the
/// same way on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Priority {
    Low = 1,
    Normal = 2,
    High = 3,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            1 => Some(Priority::Low),
            2 => Some(Priority::Normal),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "normal" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        p.as_i64()
    }
}

impl TryFrom<i64> for Priority {
    type Error = String;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Priority::from_i64(v).ok_or_else(|| format!("invalid priority: {}", v))
    }
}

/// Task status. Stored and serialized as its snake_case text code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Status::Todo),
            "in_progress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

/// A task row. `id` is assigned by the store and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub due_at: Option<NaiveDateTime>,
    pub estimate_min: i64,
    pub priority: Priority,
    pub status: Status,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for creating a task. Everything but `title` has a default.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_at: Option<NaiveDateTime>,
    pub estimate_min: i64,
    pub priority: Priority,
    pub parent_id: Option<i64>,
}

/// Partial update over the allowed field set. A field left `None` is
/// untouched; `due_at` and `parent_id` carry a nested option so they can
/// be cleared explicitly. Unknown fields cannot be expressed here; the
/// dispatcher rejects them while building the patch from the wire payload.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<Option<NaiveDateTime>>,
    pub estimate_min: Option<i64>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub parent_id: Option<Option<i64>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_at.is_none()
            && self.estimate_min.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_codes_round_trip() {
        for p in [Priority::Low, Priority::Normal, Priority::High] {
            assert_eq!(Priority::from_i64(p.as_i64()), Some(p));
        }
        assert_eq!(Priority::from_i64(0), None);
        assert_eq!(Priority::from_i64(4), None);
    }

    #[test]
    fn priority_from_name_is_case_insensitive() {
        assert_eq!(Priority::from_name("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_name("normal"), Some(Priority::Normal));
        assert_eq!(Priority::from_name("urgent"), None);
    }

    #[test]
    fn status_codes_round_trip() {
        for s in [Status::Todo, Status::InProgress, Status::Done] {
            assert_eq!(Status::from_str(s.as_str()), Some(s));
        }
        assert_eq!(Status::from_str("cancelled"), None);
    }

    #[test]
    fn priority_serializes_as_integer() {
        let json = serde_json::to_value(Priority::High).unwrap();
        assert_eq!(json, serde_json::json!(3));
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_value(Status::InProgress).unwrap();
        assert_eq!(json, serde_json::json!("in_progress"));
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            status: Some(Status::Done),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
