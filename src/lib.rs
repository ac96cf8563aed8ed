pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod notifier;
pub mod reminder;
pub mod scheduler;
pub mod storage;
pub mod watcher;

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use log::{error, info};

use crate::dispatch::{Dispatcher, Signal};
use crate::error::AppResult;
use crate::notifier::DesktopNotifier;
use crate::scheduler::ThreadScheduler;
use crate::storage::Storage;
use crate::watcher::StoreWatcher;

enum DaemonEvent {
    Signal(Signal),
    StoreChanged,
}

/// Run the reminder daemon: a scheduler thread emitting wake-ups, a desktop
/// notifier feeding user actions back, and reconciliation of the schedule
/// against the store whenever it changes, whether from this process or from
/// another CLI invocation editing the list.
///
/// Blocks until the process is killed.
pub fn run_daemon(mut storage: Storage) -> AppResult<()> {
    let store_events = storage.subscribe();
    let store_path = storage.store_path();
    let storage = Arc::new(Mutex::new(storage));

    let (event_tx, event_rx) = mpsc::channel::<DaemonEvent>();

    // Scheduler wake-ups and notification actions funnel into one channel,
    // so every mutation goes through the single dispatcher below.
    let (signal_tx, signal_rx) = mpsc::channel::<Signal>();
    let scheduler = ThreadScheduler::spawn(signal_tx.clone());
    let notifier = DesktopNotifier::new(signal_tx);

    let forward = event_tx.clone();
    thread::spawn(move || {
        for signal in signal_rx {
            if forward.send(DaemonEvent::Signal(signal)).is_err() {
                break;
            }
        }
    });

    let forward = event_tx.clone();
    thread::spawn(move || {
        for _ in store_events {
            if forward.send(DaemonEvent::StoreChanged).is_err() {
                break;
            }
        }
    });

    let (fs_tx, fs_rx) = mpsc::channel();
    let _watcher = StoreWatcher::spawn(&store_path, fs_tx)?;
    let forward = event_tx.clone();
    thread::spawn(move || {
        for _ in fs_rx {
            if forward.send(DaemonEvent::StoreChanged).is_err() {
                break;
            }
        }
    });
    drop(event_tx);

    let mut dispatcher = Dispatcher::new(storage, scheduler, notifier);
    dispatcher.reconcile()?;
    info!("daemon started, store at {}", store_path.display());

    for event in event_rx {
        match event {
            DaemonEvent::Signal(signal) => {
                if let Err(e) = dispatcher.dispatch(signal) {
                    error!("failed to dispatch {:?}: {}", signal, e);
                }
            }
            DaemonEvent::StoreChanged => {
                if let Err(e) = dispatcher.reconcile() {
                    error!("failed to reconcile schedule: {}", e);
                }
            }
        }
    }

    Ok(())
}
