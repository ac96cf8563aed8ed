/// Application configuration constants
///
/// Centralized configuration for the reminder app.

/// Directory name under the platform's local data dir holding the store
pub const APP_DATA_DIR: &str = "ConstantReminder";

/// Flat key the reminder list is persisted under (also the store file stem)
pub const REMINDERS_KEY: &str = "reminders_list";

/// Lower bound for a reminder interval (1 minute)
pub const MIN_INTERVAL_MS: i64 = 60_000;

/// "Remind more often": frequency multiplier, applied as interval / factor
pub const INCREASE_FACTOR: f64 = 1.3;

/// "Remind less often": frequency multiplier, applied as interval / factor
pub const DECREASE_FACTOR: f64 = 0.7;

/// How often the scheduler thread checks its deadline queue
pub const SCHEDULER_TICK_MS: u64 = 500;

/// How long a manual `trigger` invocation waits for a notification action
pub const TRIGGER_WAIT_SECS: u64 = 120;

/// Day-granularity interval display gets a "~" marker past this rounding error
pub const DAY_APPROX_THRESHOLD_HOURS: f64 = 6.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_interval_is_one_minute() {
        assert_eq!(MIN_INTERVAL_MS, 60 * 1000);
    }

    #[test]
    fn test_factors_are_reciprocal_directions() {
        assert!(INCREASE_FACTOR > 1.0);
        assert!(DECREASE_FACTOR < 1.0);
        assert!(DECREASE_FACTOR > 0.0);
    }

    #[test]
    fn test_scheduler_tick_is_subsecond() {
        assert!(SCHEDULER_TICK_MS <= 1000);
        assert!(SCHEDULER_TICK_MS > 0);
    }
}
