use chrono::{DateTime, Duration, Local, TimeZone};

use crate::config::DAY_APPROX_THRESHOLD_HOURS;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Render an interval for the list view: `HH:MM` under a day, whole days
/// above, with a `~` marker when rounding to days is off by more than six
/// hours.
pub fn format_interval(interval_ms: i64) -> String {
    if interval_ms < DAY_MS {
        let hours = interval_ms / HOUR_MS;
        let minutes = (interval_ms % HOUR_MS) / 60_000;
        format!("{:02}:{:02}", hours, minutes)
    } else {
        let total_hours = interval_ms as f64 / HOUR_MS as f64;
        let days = (total_hours / 24.0).round() as i64;
        let diff_hours = (total_hours - days as f64 * 24.0).abs();
        let prefix = if diff_hours > DAY_APPROX_THRESHOLD_HOURS {
            "~"
        } else {
            ""
        };
        format!("{}{} days", prefix, days)
    }
}

/// Render the "last shown" timestamp relative to `now`: today shows the time
/// only, yesterday is named, anything within six days gets the weekday, older
/// entries the full date. Zero means never shown.
pub fn format_last_shown(last_shown_ms: i64, now: DateTime<Local>) -> String {
    if last_shown_ms <= 0 {
        return "--:--".to_string();
    }
    let last = match Local.timestamp_millis_opt(last_shown_ms).single() {
        Some(dt) => dt,
        None => return "--:--".to_string(),
    };

    let today = now.date_naive();
    let yesterday = today - Duration::days(1);
    let diff_days = (now.timestamp_millis() - last_shown_ms) / DAY_MS;

    if last.date_naive() == today {
        last.format("%H:%M").to_string()
    } else if last.date_naive() == yesterday {
        format!("yesterday {}", last.format("%H:%M"))
    } else if diff_days < 6 {
        last.format("%A %H:%M").to_string()
    } else {
        last.format("%d.%m.%Y").to_string()
    }
}
