mod local;
pub mod merge;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use log::debug;

use crate::config::{APP_DATA_DIR, REMINDERS_KEY};
use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;

/// Emitted to subscribers after every successful save, naming the changed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: &'static str,
}

/// Durable mapping from the flat `reminders_list` key to the JSON array of
/// all reminders, plus a broadcast-style change notification.
///
/// The store owns the canonical on-disk representation. Callers reload at the
/// start of every operation; there is no long-lived in-memory authority.
pub struct Storage {
    app_data_path: PathBuf,
    subscribers: Vec<mpsc::Sender<StoreEvent>>,
}

impl Storage {
    pub fn new() -> AppResult<Self> {
        let app_data_path = dirs::data_local_dir()
            .ok_or_else(|| AppError::storage("failed to get local data dir"))?
            .join(APP_DATA_DIR);

        fs::create_dir_all(&app_data_path)
            .map_err(|e| AppError::storage(format!("failed to create data dir: {}", e)))?;

        Ok(Self::with_path(app_data_path))
    }

    /// Storage rooted at an explicit directory (tests, alternate profiles).
    pub fn with_path(app_data_path: PathBuf) -> Self {
        Self {
            app_data_path,
            subscribers: Vec::new(),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.app_data_path.join(format!("{}.json", REMINDERS_KEY))
    }

    pub fn app_data_path(&self) -> &Path {
        &self.app_data_path
    }

    /// Hand out a receiver that observes every subsequent successful save.
    pub fn subscribe(&mut self) -> mpsc::Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Read the full reminder list. Absent or malformed state yields the
    /// empty list; only an unreadable file is an error.
    pub fn load(&self) -> AppResult<Vec<Reminder>> {
        local::load_local(&self.store_path())
    }

    /// Persist the full list in order, then notify subscribers.
    pub fn save(&mut self, list: &[Reminder]) -> AppResult<()> {
        local::save_local(&self.store_path(), list)?;
        self.notify_change();
        Ok(())
    }

    fn notify_change(&mut self) {
        self.subscribers
            .retain(|tx| tx.send(StoreEvent { key: REMINDERS_KEY }).is_ok());
    }

    // ============ Read-modify-write operations ============

    /// Create a reminder and append it to the list. Name and text must be
    /// non-empty and the interval positive.
    pub fn add(&mut self, name: String, text: String, interval_ms: i64) -> AppResult<Reminder> {
        if name.is_empty() || text.is_empty() {
            return Err(AppError::validation("name and text must not be empty"));
        }
        if interval_ms <= 0 {
            return Err(AppError::validation("interval must be greater than 0"));
        }

        let mut list = self.load()?;
        let mut reminder = Reminder::new(name, text, interval_ms);
        // Timestamp-derived ids can collide within one process; bump past
        // any id already in the list.
        while list.iter().any(|r| r.id == reminder.id) {
            reminder.id = reminder.id.wrapping_add(1).max(0);
        }

        list.push(reminder.clone());
        self.save(&list)?;
        Ok(reminder)
    }

    /// Remove the reminder with this id. Returns whether anything was removed.
    pub fn delete(&mut self, id: i32) -> AppResult<bool> {
        let mut list = self.load()?;
        let before = list.len();
        list.retain(|r| r.id != id);

        if list.len() == before {
            debug!("delete: id {} not found, nothing to do", id);
            return Ok(false);
        }

        self.save(&list)?;
        Ok(true)
    }

    /// Merge an external JSON payload into the store. Returns the newly
    /// appended reminders so the caller can schedule them immediately.
    pub fn import(&mut self, payload: &str) -> AppResult<Vec<Reminder>> {
        let mut list = self.load()?;
        let added = merge::merge_import(&mut list, payload)?;

        if !added.is_empty() {
            self.save(&list)?;
        }
        Ok(added)
    }

    /// The raw persisted JSON array as opaque text, for sharing. No envelope,
    /// no transformation.
    pub fn export(&self) -> AppResult<String> {
        let path = self.store_path();
        if !path.exists() {
            return Ok("[]".to_string());
        }
        fs::read_to_string(&path)
            .map_err(|e| AppError::storage(format!("failed to read {}: {}", path.display(), e)))
    }
}
