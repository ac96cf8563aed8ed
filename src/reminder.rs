use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{DECREASE_FACTOR, INCREASE_FACTOR, MIN_INTERVAL_MS};

/// One recurring notification definition.
///
/// The wire shape (persisted store value and import/export payloads) uses
/// camelCase keys: `id`, `name`, `text`, `intervalMs`, `lastShownMs`,
/// `totalShownCount`. The last two are optional and default to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i32,
    pub name: String,
    pub text: String,
    pub interval_ms: i64,
    #[serde(default)]
    pub last_shown_ms: i64,
    #[serde(default)]
    pub total_shown_count: u32,
}

impl Reminder {
    pub fn new(name: String, text: String, interval_ms: i64) -> Self {
        Self {
            id: generate_id(),
            name,
            text,
            interval_ms,
            last_shown_ms: 0,
            total_shown_count: 0,
        }
    }

    /// Record that the notification was actually presented to the user.
    /// This is the only place shown-stats are allowed to change.
    pub fn mark_shown(&mut self, now_ms: i64) {
        self.last_shown_ms = now_ms;
        self.total_shown_count += 1;
    }

    /// "Remind more often": shrink the interval by the frequency factor.
    /// frequency = 1/interval, so new interval = old interval / factor.
    pub fn increase_frequency(&mut self) {
        self.interval_ms = adjusted_interval(self.interval_ms, INCREASE_FACTOR);
    }

    /// "Remind less often": grow the interval by the reciprocal factor.
    pub fn decrease_frequency(&mut self) {
        self.interval_ms = adjusted_interval(self.interval_ms, DECREASE_FACTOR);
    }
}

fn adjusted_interval(interval_ms: i64, factor: f64) -> i64 {
    ((interval_ms as f64 / factor) as i64).max(MIN_INTERVAL_MS)
}

/// Ids come from the current epoch millis reduced into the positive i32 range.
/// Two creations in the same millisecond window can collide; callers appending
/// to an existing list should bump past known ids (see Storage::add).
pub fn generate_id() -> i32 {
    (Utc::now().timestamp_millis() % i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_reminder(interval_ms: i64) -> Reminder {
        Reminder {
            id: 7,
            name: "Gratitude".to_string(),
            text: "Time for a moment of gratitude.".to_string(),
            interval_ms,
            last_shown_ms: 0,
            total_shown_count: 0,
        }
    }

    #[test]
    fn test_generated_id_is_positive() {
        let id = generate_id();
        assert!(id >= 0);
    }

    #[test]
    fn test_increase_frequency_shrinks_interval() {
        let mut r = make_reminder(300_000);
        r.increase_frequency();
        assert_eq!(r.interval_ms, 230_769);
    }

    #[test]
    fn test_decrease_frequency_grows_interval() {
        let mut r = make_reminder(230_769);
        r.decrease_frequency();
        assert_eq!(r.interval_ms, 329_670);
    }

    #[test]
    fn test_interval_never_drops_below_floor() {
        let mut r = make_reminder(300_000);
        for _ in 0..100 {
            r.increase_frequency();
            assert!(r.interval_ms >= MIN_INTERVAL_MS);
        }
        assert_eq!(r.interval_ms, MIN_INTERVAL_MS);
    }

    #[test]
    fn test_increase_strictly_decreases_above_floor() {
        let mut r = make_reminder(MIN_INTERVAL_MS + 50_000);
        let before = r.interval_ms;
        r.increase_frequency();
        assert!(r.interval_ms < before);
    }

    #[test]
    fn test_decrease_strictly_increases() {
        let mut r = make_reminder(MIN_INTERVAL_MS);
        r.decrease_frequency();
        assert!(r.interval_ms > MIN_INTERVAL_MS);
    }

    #[test]
    fn test_mark_shown_updates_stats() {
        let mut r = make_reminder(300_000);
        r.mark_shown(1_700_000_000_000);
        assert_eq!(r.total_shown_count, 1);
        assert_eq!(r.last_shown_ms, 1_700_000_000_000);
        r.mark_shown(1_700_000_060_000);
        assert_eq!(r.total_shown_count, 2);
        assert!(r.last_shown_ms >= 1_700_000_000_000);
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let r = make_reminder(300_000);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"intervalMs\":300000"));
        assert!(json.contains("\"lastShownMs\""));
        assert!(json.contains("\"totalShownCount\""));
    }

    #[test]
    fn test_optional_fields_default_to_zero() {
        let json = r#"{"id":1,"name":"a","text":"b","intervalMs":60000}"#;
        let r: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.last_shown_ms, 0);
        assert_eq!(r.total_shown_count, 0);
    }
}
