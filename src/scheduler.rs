use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use log::debug;

use crate::config::SCHEDULER_TICK_MS;
use crate::dispatch::{Action, Scheduler, Signal};

#[derive(Debug, Clone)]
struct QueueEntry {
    id: i32,
    next_fire_ms: i64,
    interval_ms: i64,
}

/// In-process replacement for a platform alarm service: a background thread
/// owns a deadline-sorted queue and emits `Fire` signals into the dispatcher
/// channel, re-arming each entry at `fire time + interval`.
///
/// Scheduling an id that is already queued replaces its entry, so adjusting
/// an interval restarts the period from now.
pub struct ThreadScheduler {
    queue: Arc<Mutex<Vec<QueueEntry>>>,
    kill_switch: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn spawn(signals: mpsc::Sender<Signal>) -> Self {
        let queue: Arc<Mutex<Vec<QueueEntry>>> = Arc::new(Mutex::new(Vec::new()));
        let kill_switch = Arc::new(AtomicBool::new(false));

        let thread_queue = Arc::clone(&queue);
        let thread_kill = Arc::clone(&kill_switch);
        let handle = thread::spawn(move || {
            debug!("scheduler thread started");
            while !thread_kill.load(Ordering::Relaxed) {
                let now_ms = Utc::now().timestamp_millis();
                let due: Vec<i32> = {
                    let mut queue = thread_queue.lock().unwrap();
                    let mut due = Vec::new();
                    for entry in queue.iter_mut() {
                        if entry.next_fire_ms <= now_ms {
                            due.push(entry.id);
                            entry.next_fire_ms = now_ms + entry.interval_ms;
                        }
                    }
                    queue.sort_by_key(|e| e.next_fire_ms);
                    due
                };

                for id in due {
                    if signals.send(Signal::new(id, Action::Fire)).is_err() {
                        // receiver gone, nothing left to drive
                        debug!("signal channel closed, stopping scheduler thread");
                        return;
                    }
                }

                thread::sleep(Duration::from_millis(SCHEDULER_TICK_MS));
            }
            debug!("scheduler thread terminated");
        });

        Self {
            queue,
            kill_switch,
            handle: Some(handle),
        }
    }

    #[cfg(test)]
    fn queued_ids(&self) -> Vec<i32> {
        self.queue.lock().unwrap().iter().map(|e| e.id).collect()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(&mut self, id: i32, first_fire_ms: i64, interval_ms: i64) {
        let mut queue = self.queue.lock().unwrap();
        queue.retain(|e| e.id != id);
        queue.push(QueueEntry {
            id,
            next_fire_ms: first_fire_ms,
            interval_ms,
        });
        queue.sort_by_key(|e| e.next_fire_ms);
    }

    fn cancel(&mut self, id: i32) {
        self.queue.lock().unwrap().retain(|e| e.id != id);
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.kill_switch.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_due_entry_emits_fire_signal() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::spawn(tx);

        let now_ms = Utc::now().timestamp_millis();
        scheduler.schedule_repeating(7, now_ms, 3_600_000);

        let signal = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(signal, Signal::new(7, Action::Fire));
    }

    #[test]
    fn test_future_entry_does_not_fire_early() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::spawn(tx);

        let now_ms = Utc::now().timestamp_millis();
        scheduler.schedule_repeating(7, now_ms + 3_600_000, 3_600_000);

        assert!(rx.recv_timeout(Duration::from_millis(1500)).is_err());
    }

    #[test]
    fn test_cancel_removes_entry() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::spawn(tx);

        let now_ms = Utc::now().timestamp_millis();
        scheduler.schedule_repeating(7, now_ms + 3_600_000, 3_600_000);
        scheduler.cancel(7);

        assert!(scheduler.queued_ids().is_empty());
        assert!(rx.recv_timeout(Duration::from_millis(1200)).is_err());
    }

    #[test]
    fn test_reschedule_replaces_entry() {
        let (tx, _rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::spawn(tx);

        let now_ms = Utc::now().timestamp_millis();
        scheduler.schedule_repeating(7, now_ms + 3_600_000, 3_600_000);
        scheduler.schedule_repeating(7, now_ms + 7_200_000, 7_200_000);

        assert_eq!(scheduler.queued_ids(), vec![7]);
    }

    #[test]
    fn test_fired_entry_rearms() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::spawn(tx);

        let now_ms = Utc::now().timestamp_millis();
        scheduler.schedule_repeating(7, now_ms, 3_600_000);

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        // still queued, one interval out
        assert_eq!(scheduler.queued_ids(), vec![7]);
        let queue = scheduler.queue.lock().unwrap();
        assert!(queue[0].next_fire_ms > now_ms);
    }
}
