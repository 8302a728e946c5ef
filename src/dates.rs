//! Due-date normalization.
//!
//! Free-text due dates are matched against a fixed, ordered list of accepted
//! formats; the first one that parses wins. No detection heuristics, no
//! timezone handling (all timestamps are naive local time).

use crate::error::{CommandError, CommandResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Accepted formats, tried in order. The flag marks formats that carry a
/// time-of-day component; date-only formats resolve to midnight.
const DATE_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M", true),
    ("%Y-%m-%d", false),
    ("%Y/%m/%d %H:%M", true),
    ("%Y/%m/%d", false),
    ("%d.%m.%Y %H:%M", true),
    ("%d.%m.%Y", false),
];

/// Parse an optional due-date string into an optional timestamp.
///
/// Empty or absent input is not an error; it simply means "no due date".
pub fn parse_due(text: Option<&str>) -> CommandResult<Option<NaiveDateTime>> {
    let Some(text) = text else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    for (format, has_time) in DATE_FORMATS {
        if *has_time {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Some(dt));
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(Some(date.and_time(NaiveTime::MIN)));
        }
    }

    Err(CommandError::invalid_date(text))
}
