use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;

/// Merge an externally supplied JSON array of reminders into the current list,
/// keyed by id. Entries whose id is already present are silently skipped, new
/// ids are appended in payload order. Returns the appended reminders so the
/// caller can schedule them right away.
///
/// Parsing is all-or-nothing: an unparseable payload (including one
/// structurally invalid element) aborts the whole import and leaves the
/// current list untouched.
pub fn merge_import(current: &mut Vec<Reminder>, payload: &str) -> AppResult<Vec<Reminder>> {
    let incoming: Vec<Reminder> = serde_json::from_str(payload)
        .map_err(|e| AppError::import(format!("invalid JSON format: {}", e)))?;

    let mut known: HashSet<i32> = current.iter().map(|r| r.id).collect();
    let mut added = Vec::new();

    for reminder in incoming {
        if known.insert(reminder.id) {
            current.push(reminder.clone());
            added.push(reminder);
        }
    }

    Ok(added)
}
