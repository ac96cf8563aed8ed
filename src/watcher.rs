use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{AppError, AppResult};

/// Watches the store file for writes made by another process (a second CLI
/// invocation editing the list while the daemon runs) and forwards a unit
/// event per observed change. The in-process counterpart is
/// `Storage::subscribe`; together they mirror the original's
/// preference-change listener.
///
/// The parent directory is watched rather than the file itself, since saves
/// replace the file by rename.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
}

impl StoreWatcher {
    pub fn spawn(store_path: &Path, changed: mpsc::Sender<()>) -> AppResult<Self> {
        let dir = store_path
            .parent()
            .ok_or_else(|| AppError::storage("store path has no parent directory"))?
            .to_path_buf();
        let store_path: PathBuf = store_path.to_path_buf();

        let (raw_tx, raw_rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(raw_tx)
            .map_err(|e| AppError::storage(format!("failed to create watcher: {}", e)))?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::storage(format!("failed to watch {}: {}", dir.display(), e)))?;

        thread::spawn(move || {
            debug!("store watcher thread started");
            for result in raw_rx {
                match result {
                    Ok(event) => {
                        if !touches_store(&event, &store_path) {
                            continue;
                        }
                        if changed.send(()).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("watch error: {}", e),
                }
            }
            debug!("store watcher thread terminated");
        });

        Ok(Self { _watcher: watcher })
    }
}

fn touches_store(event: &Event, store_path: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant && event.paths.iter().any(|p| p == store_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("constant_reminder_watch_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_to_store_file_is_observed() {
        let dir = scratch_dir("observed");
        let store_path = dir.join("reminders_list.json");
        fs::write(&store_path, "[]").unwrap();

        let (tx, rx) = mpsc::channel();
        let _watcher = StoreWatcher::spawn(&store_path, tx).unwrap();

        // small grace period so the watch is in place before the write
        thread::sleep(Duration::from_millis(300));
        fs::write(&store_path, r#"[{"id":1,"name":"a","text":"b","intervalMs":60000}]"#).unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_unrelated_file_is_ignored() {
        let dir = scratch_dir("ignored");
        let store_path = dir.join("reminders_list.json");
        fs::write(&store_path, "[]").unwrap();

        let (tx, rx) = mpsc::channel();
        let _watcher = StoreWatcher::spawn(&store_path, tx).unwrap();

        thread::sleep(Duration::from_millis(300));
        fs::write(dir.join("other.json"), "{}").unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(1200)).is_err());
    }
}
