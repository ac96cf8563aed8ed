use std::sync::mpsc;
use std::thread;

use log::{debug, warn};
use notify_rust::Notification;

use crate::dispatch::{Action, Notifier, Signal};
use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;

/// Action identifiers carried on the notification buttons.
const ACTION_INCREASE: &str = "increase";
const ACTION_OK: &str = "ok";
const ACTION_DECREASE: &str = "decrease";

/// Desktop notification backend.
///
/// Each shown notification gets its own thread that blocks on the user's
/// action and maps it back into a dispatcher signal, so "remind more often" /
/// "remind less often" / "ok" round-trip through the same channel the
/// scheduler feeds.
pub struct DesktopNotifier {
    signals: mpsc::Sender<Signal>,
}

impl DesktopNotifier {
    pub fn new(signals: mpsc::Sender<Signal>) -> Self {
        Self { signals }
    }

    fn build(reminder: &Reminder) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&reminder.name)
            .body(&reminder.text)
            .appname("constant-reminder")
            .action(ACTION_INCREASE, "remind more often")
            .action(ACTION_OK, "ok")
            .action(ACTION_DECREASE, "remind less often");
        notification
    }
}

impl Notifier for DesktopNotifier {
    fn show(&mut self, reminder: &Reminder) -> AppResult<()> {
        let notification = Self::build(reminder);
        let id = reminder.id;
        let signals = self.signals.clone();

        thread::spawn(move || match show_and_wait(&notification, id) {
            Ok(Some(action)) => {
                if signals.send(Signal::new(id, action)).is_err() {
                    debug!("signal channel closed, dropping action for {}", id);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("notification for {} failed: {}", id, e),
        });

        Ok(())
    }

    fn cancel(&mut self, id: i32) {
        // Desktop servers close the notification themselves when an action is
        // invoked; there is no close-by-id call to make here.
        debug!("cancel notification {}", id);
    }
}

/// Show the notification and block until the user acts on it or the server
/// closes it. Returns the mapped action, or None when it simply expired.
#[cfg(all(unix, not(target_os = "macos")))]
fn show_and_wait(notification: &Notification, id: i32) -> AppResult<Option<Action>> {
    let handle = notification
        .show()
        .map_err(|e| AppError::notify(e.to_string()))?;

    let mut chosen = None;
    handle.wait_for_action(|action| {
        chosen = match action {
            ACTION_INCREASE => Some(Action::IncreaseFrequency),
            ACTION_DECREASE => Some(Action::DecreaseFrequency),
            ACTION_OK => Some(Action::Dismiss),
            // "__closed" and any server-specific default
            _ => None,
        };
    });
    debug!("notification {} resolved to {:?}", id, chosen);
    Ok(chosen)
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_and_wait(notification: &Notification, _id: i32) -> AppResult<Option<Action>> {
    // No action support on this platform; fire-and-forget.
    notification
        .show()
        .map_err(|e| AppError::notify(e.to_string()))?;
    Ok(None)
}
