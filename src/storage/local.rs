use std::fs;
use std::path::Path;

use log::warn;

use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;

/// Load the reminder list from the store file.
///
/// An absent file is an empty list. A value that does not parse as the
/// expected JSON array (including elements missing a required field) is
/// treated as empty too: losing stale data is preferable to blocking the
/// whole app on a corrupt store.
pub fn load_local(path: &Path) -> AppResult<Vec<Reminder>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::storage(format!("failed to read {}: {}", path.display(), e)))?;

    match serde_json::from_str::<Vec<Reminder>>(&content) {
        Ok(list) => Ok(list),
        Err(e) => {
            warn!(
                "malformed store value at {}, recovering with empty list: {}",
                path.display(),
                e
            );
            Ok(Vec::new())
        }
    }
}

/// Save the whole reminder list, in order, as a JSON array.
///
/// The list is the unit of persistence: the new value replaces the old one
/// atomically via a temp file and rename, never partially.
pub fn save_local(path: &Path, list: &[Reminder]) -> AppResult<()> {
    let content = serde_json::to_string_pretty(list)
        .map_err(|e| AppError::parse(format!("failed to serialize reminders: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)
        .map_err(|e| AppError::storage(format!("failed to write {}: {}", tmp_path.display(), e)))?;
    fs::rename(&tmp_path, path)
        .map_err(|e| AppError::storage(format!("failed to replace {}: {}", path.display(), e)))?;
    Ok(())
}
