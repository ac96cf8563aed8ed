use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{debug, warn};

use crate::error::AppResult;
use crate::reminder::Reminder;
use crate::storage::Storage;

/// The four effects a wake-up or notification action can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fire,
    IncreaseFrequency,
    DecreaseFrequency,
    Dismiss,
}

/// An incoming signal: a reminder id tagged with the requested effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub reminder_id: i32,
    pub action: Action,
}

impl Signal {
    pub fn new(reminder_id: i32, action: Action) -> Self {
        Self { reminder_id, action }
    }
}

/// Arranges repeating wake-up signals keyed by reminder id.
pub trait Scheduler {
    fn schedule_repeating(&mut self, id: i32, first_fire_ms: i64, interval_ms: i64);
    fn cancel(&mut self, id: i32);
}

/// Renders and cancels the dismissible notification for a reminder.
pub trait Notifier {
    fn show(&mut self, reminder: &Reminder) -> AppResult<()>;
    fn cancel(&mut self, id: i32);
}

/// Routes signals to their effect: show a notification and bump stats, adjust
/// the interval and reschedule, or just dismiss.
///
/// The list is reloaded from the store on every signal; a signal for an id no
/// longer in the list is tolerated as a no-op, since the reminder may have
/// been deleted after the wake-up was scheduled.
pub struct Dispatcher<S: Scheduler, N: Notifier> {
    storage: Arc<Mutex<Storage>>,
    scheduler: S,
    notifier: N,
    // Mirror of what the scheduler currently holds (id -> interval), so that
    // reconcile() can tell a real change from its own echo.
    armed: HashMap<i32, i64>,
}

impl<S: Scheduler, N: Notifier> Dispatcher<S, N> {
    pub fn new(storage: Arc<Mutex<Storage>>, scheduler: S, notifier: N) -> Self {
        Self {
            storage,
            scheduler,
            notifier,
            armed: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, signal: Signal) -> AppResult<()> {
        let id = signal.reminder_id;

        // Load-modify-save under the lock, then apply the external effects.
        let mutated = {
            let mut storage = self.storage.lock().unwrap();
            let mut list = storage.load()?;

            let Some(pos) = list.iter().position(|r| r.id == id) else {
                debug!("signal for unknown reminder {}, ignoring", id);
                return Ok(());
            };

            match signal.action {
                Action::Fire => list[pos].mark_shown(Utc::now().timestamp_millis()),
                Action::IncreaseFrequency => list[pos].increase_frequency(),
                Action::DecreaseFrequency => list[pos].decrease_frequency(),
                Action::Dismiss => {}
            }

            if signal.action != Action::Dismiss {
                storage.save(&list)?;
            }
            list[pos].clone()
        };

        match signal.action {
            Action::Fire => {
                // Degraded path: a failed show never rolls back the stats.
                if let Err(e) = self.notifier.show(&mutated) {
                    warn!("failed to show notification for {}: {}", id, e);
                }
            }
            Action::IncreaseFrequency | Action::DecreaseFrequency => {
                self.arm(id, mutated.interval_ms);
                self.notifier.cancel(id);
            }
            Action::Dismiss => {
                self.notifier.cancel(id);
            }
        }

        Ok(())
    }

    /// Re-derive the schedule from the persisted list: arm new ids, re-arm
    /// changed intervals, cancel ids that are gone. Triggered at startup and
    /// on every store change notification; idempotent, so running it
    /// redundantly is harmless.
    pub fn reconcile(&mut self) -> AppResult<()> {
        let list = self.storage.lock().unwrap().load()?;

        let gone: Vec<i32> = self
            .armed
            .keys()
            .filter(|id| !list.iter().any(|r| r.id == **id))
            .copied()
            .collect();
        for id in gone {
            self.scheduler.cancel(id);
            self.armed.remove(&id);
            self.notifier.cancel(id);
        }

        for reminder in &list {
            if self.armed.get(&reminder.id) != Some(&reminder.interval_ms) {
                self.arm(reminder.id, reminder.interval_ms);
            }
        }

        Ok(())
    }

    fn arm(&mut self, id: i32, interval_ms: i64) {
        let first_fire_ms = Utc::now().timestamp_millis() + interval_ms;
        self.scheduler.schedule_repeating(id, first_fire_ms, interval_ms);
        self.armed.insert(id, interval_ms);
    }
}
