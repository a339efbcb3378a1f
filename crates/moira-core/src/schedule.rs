//! Weekly watch schedules shared by triggers and subscriptions.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Last minute of a day, the default end of a schedule window.
pub const LAST_MINUTE_OF_DAY: i32 = 24 * 60 - 1;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One day of a weekly schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Day name, serialized as `Mon`..`Sun`.
    pub name: Weekday,
    /// Whether alerts are evaluated on this day.
    pub enabled: bool,
}

/// A weekly schedule with a daily time window in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Per-day switches.
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
    /// Timezone offset in minutes.
    #[serde(rename = "tzOffset", default)]
    pub tz_offset: i32,
    /// Window start, minutes since midnight.
    #[serde(rename = "startOffset", default)]
    pub start_offset: i32,
    /// Window end, minutes since midnight.
    #[serde(rename = "endOffset", default = "default_end_offset")]
    pub end_offset: i32,
}

const fn default_end_offset() -> i32 {
    LAST_MINUTE_OF_DAY
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            days: WEEK
                .iter()
                .map(|&name| ScheduleDay {
                    name,
                    enabled: true,
                })
                .collect(),
            tz_offset: 0,
            start_offset: 0,
            end_offset: LAST_MINUTE_OF_DAY,
        }
    }
}

impl Schedule {
    /// Returns the enabled days in schedule order.
    #[must_use]
    pub fn enabled_days(&self) -> Vec<Weekday> {
        self.days
            .iter()
            .filter(|d| d.enabled)
            .map(|d| d.name)
            .collect()
    }

    /// True when every day is enabled and the window covers the whole day.
    #[must_use]
    pub fn is_always(&self) -> bool {
        self.days.len() == WEEK.len()
            && self.days.iter().all(|d| d.enabled)
            && self.start_offset == 0
            && self.end_offset == LAST_MINUTE_OF_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_covers_whole_week() {
        let sched = Schedule::default();
        assert!(sched.is_always());
        assert_eq!(sched.enabled_days().len(), 7);
    }

    #[test]
    fn schedule_uses_wire_field_names() {
        let json = serde_json::to_value(Schedule::default()).unwrap();
        assert_eq!(json["tzOffset"], 0);
        assert_eq!(json["endOffset"], LAST_MINUTE_OF_DAY);
        assert_eq!(json["days"][0]["name"], "Mon");
    }

    #[test]
    fn schedule_parses_partial_payload() {
        let sched: Schedule = serde_json::from_str(
            r#"{"days":[{"name":"Sat","enabled":false},{"name":"Sun","enabled":true}]}"#,
        )
        .unwrap();
        assert_eq!(sched.enabled_days(), vec![Weekday::Sun]);
        assert_eq!(sched.end_offset, LAST_MINUTE_OF_DAY);
        assert!(!sched.is_always());
    }
}
