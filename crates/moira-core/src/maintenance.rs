//! Maintenance windows and silent-pattern prolongation offsets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maintenance presets offered for metrics and triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Maintenance {
    /// Clears the maintenance window.
    Off,
    /// 15 minutes.
    QuarterHour,
    /// 1 hour.
    OneHour,
    /// 3 hours.
    ThreeHours,
    /// 6 hours.
    SixHours,
    /// 1 day.
    OneDay,
    /// 1 week.
    OneWeek,
    /// 2 weeks.
    TwoWeeks,
    /// 30 days.
    OneMonth,
}

impl Maintenance {
    /// All presets in menu order.
    pub const ALL: [Self; 9] = [
        Self::Off,
        Self::QuarterHour,
        Self::OneHour,
        Self::ThreeHours,
        Self::SixHours,
        Self::OneDay,
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
    ];

    /// Window length in minutes; zero for [`Maintenance::Off`].
    #[must_use]
    pub const fn minutes(&self) -> i64 {
        match self {
            Self::Off => 0,
            Self::QuarterHour => 15,
            Self::OneHour => 60,
            Self::ThreeHours => 180,
            Self::SixHours => 360,
            Self::OneDay => 1440,
            Self::OneWeek => 10080,
            Self::TwoWeeks => 20160,
            Self::OneMonth => 43200,
        }
    }

    /// Menu caption.
    #[must_use]
    pub const fn caption(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::QuarterHour => "15 min",
            Self::OneHour => "1 hour",
            Self::ThreeHours => "3 hours",
            Self::SixHours => "6 hours",
            Self::OneDay => "1 day",
            Self::OneWeek => "1 week",
            Self::TwoWeeks => "2 weeks",
            Self::OneMonth => "1 month",
        }
    }

    /// Short name accepted on the command line.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::QuarterHour => "15m",
            Self::OneHour => "1h",
            Self::ThreeHours => "3h",
            Self::SixHours => "6h",
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::TwoWeeks => "2w",
            Self::OneMonth => "1mo",
        }
    }

    /// The `until` value to send: `0` for off, `now + minutes * 60` otherwise.
    #[must_use]
    pub const fn until(&self, now: i64) -> i64 {
        match self {
            Self::Off => 0,
            other => now + other.minutes() * 60,
        }
    }
}

impl fmt::Display for Maintenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}

impl FromStr for Maintenance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.short_name() == s || m.caption().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown("maintenance", s))
    }
}

/// Prolongation offsets for silent patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOffset {
    /// 15 minutes.
    QuarterHour,
    /// 1 hour.
    OneHour,
    /// 3 hours.
    ThreeHours,
    /// 6 hours.
    SixHours,
    /// 1 day.
    OneDay,
    /// 1 week.
    OneWeek,
}

impl TimeOffset {
    /// All offsets in menu order.
    pub const ALL: [Self; 6] = [
        Self::QuarterHour,
        Self::OneHour,
        Self::ThreeHours,
        Self::SixHours,
        Self::OneDay,
        Self::OneWeek,
    ];

    /// Offset in minutes.
    #[must_use]
    pub const fn minutes(&self) -> i64 {
        match self {
            Self::QuarterHour => 15,
            Self::OneHour => 60,
            Self::ThreeHours => 180,
            Self::SixHours => 360,
            Self::OneDay => 1440,
            Self::OneWeek => 10080,
        }
    }

    /// Menu caption.
    #[must_use]
    pub const fn caption(&self) -> &'static str {
        match self {
            Self::QuarterHour => "15 min",
            Self::OneHour => "1 hour",
            Self::ThreeHours => "3 hours",
            Self::SixHours => "6 hours",
            Self::OneDay => "1 day",
            Self::OneWeek => "1 week",
        }
    }

    /// Short name accepted on the command line.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::QuarterHour => "15m",
            Self::OneHour => "1h",
            Self::ThreeHours => "3h",
            Self::SixHours => "6h",
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
        }
    }

    /// `now + minutes * 60`.
    #[must_use]
    pub const fn until(&self, now: i64) -> i64 {
        now + self.minutes() * 60
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}

impl FromStr for TimeOffset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.short_name() == s || o.caption().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown("time offset", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn off_sends_zero() {
        assert_eq!(Maintenance::Off.until(1_000), 0);
    }

    #[test_case(Maintenance::QuarterHour, 1_000 + 15 * 60 ; "quarter hour")]
    #[test_case(Maintenance::OneDay, 1_000 + 86_400 ; "one day")]
    #[test_case(Maintenance::OneMonth, 1_000 + 30 * 86_400 ; "one month")]
    fn positive_presets_extend_from_now(preset: Maintenance, expected: i64) {
        assert_eq!(preset.until(1_000), expected);
    }

    #[test_case("1h", Maintenance::OneHour ; "short name")]
    #[test_case("2 Weeks", Maintenance::TwoWeeks ; "caption")]
    #[test_case("off", Maintenance::Off ; "off")]
    fn maintenance_parses(input: &str, expected: Maintenance) {
        assert_eq!(input.parse::<Maintenance>().unwrap(), expected);
    }

    #[test]
    fn unknown_maintenance_is_rejected() {
        let err = "forever".parse::<Maintenance>().unwrap_err();
        assert_eq!(err.to_string(), "unknown maintenance: forever");
    }

    #[test]
    fn time_offsets() {
        assert_eq!(TimeOffset::OneWeek.minutes(), 10080);
        assert_eq!(TimeOffset::SixHours.until(0), 6 * 3600);
        assert_eq!("15m".parse::<TimeOffset>().unwrap(), TimeOffset::QuarterHour);
        assert!("2w".parse::<TimeOffset>().is_err());
    }
}
