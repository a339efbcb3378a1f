//! Evaluation states and per-metric statistics.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sort::{ColumnSort, SortOrder};
use crate::trigger::Trigger;

/// State of a trigger or of one of its metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Everything is fine.
    #[default]
    Ok,
    /// Warning threshold crossed.
    Warn,
    /// Error threshold crossed.
    Error,
    /// No data received within the TTL.
    NoData,
    /// Evaluation failed.
    Exception,
    /// Metric is deleted when its TTL expires.
    Del,
}

impl Status {
    /// Returns the wire name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::NoData => "NODATA",
            Self::Exception => "EXCEPTION",
            Self::Del => "DEL",
        }
    }

    /// True for any state other than `OK`.
    #[must_use]
    pub const fn is_problem(&self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "NODATA" => Ok(Self::NoData),
            "EXCEPTION" => Ok(Self::Exception),
            "DEL" => Ok(Self::Del),
            _ => Err(CoreError::unknown("state", s)),
        }
    }
}

/// Last evaluation result of one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    /// Current state.
    #[serde(default)]
    pub state: Status,
    /// Last check time, unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Whether notifications for this metric are suppressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<bool>,
    /// Time of the last state change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<i64>,
    /// Last value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Maintenance end, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<i64>,
}

impl MetricState {
    /// True when a maintenance window is set and has not expired yet.
    #[must_use]
    pub fn in_maintenance(&self, now: i64) -> bool {
        self.maintenance.is_some_and(|until| until > now)
    }
}

/// Current evaluation state of a trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerState {
    /// Trigger the state belongs to.
    #[serde(default)]
    pub trigger_id: String,
    /// Aggregate state.
    #[serde(default)]
    pub state: Status,
    /// Last check time, unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Severity score computed by the server.
    #[serde(default)]
    pub score: i64,
    /// Trigger-wide maintenance end, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<i64>,
    /// Error message of the last check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Per-metric states keyed by metric name.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub metrics: BTreeMap<String, MetricState>,
}

impl TriggerState {
    /// Metrics currently in a problem state, by name.
    pub fn problem_metrics(&self) -> impl Iterator<Item = (&String, &MetricState)> {
        self.metrics.iter().filter(|(_, m)| m.state.is_problem())
    }
}

/// Error counter of one metric over the requested interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStat {
    /// Metric name.
    pub metric: String,
    /// Trigger owning the metric.
    pub trigger: Trigger,
    /// Current state of the metric.
    #[serde(default)]
    pub current_state: Status,
    /// Number of error events in the interval.
    #[serde(default)]
    pub error_count: u64,
}

/// Response of `GET /stats/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    /// Statistics rows.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<MetricStat>,
}

/// Sortable columns of the metric statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricColumn {
    /// Metric name.
    Metric,
    /// Owning trigger name.
    Trigger,
    /// Error counter.
    ErrorCount,
}

impl MetricColumn {
    /// Returns the column key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Trigger => "trigger",
            Self::ErrorCount => "error_count",
        }
    }

    fn compare(self, left: &MetricStat, right: &MetricStat) -> Ordering {
        match self {
            Self::Metric => left.metric.cmp(&right.metric),
            Self::Trigger => left.trigger.name.cmp(&right.trigger.name),
            Self::ErrorCount => left.error_count.cmp(&right.error_count),
        }
    }
}

impl FromStr for MetricColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "metric" => Ok(Self::Metric),
            "trigger" => Ok(Self::Trigger),
            "error_count" => Ok(Self::ErrorCount),
            _ => Err(CoreError::unknown("metric column", s)),
        }
    }
}

/// Sort state of the metric statistics table.
pub type MetricSort = ColumnSort<MetricColumn>;

impl Default for MetricSort {
    fn default() -> Self {
        Self::new(MetricColumn::ErrorCount, SortOrder::Desc)
    }
}

impl MetricSort {
    /// Sorts rows in place. The sort is stable: equal keys keep server order.
    pub fn apply(&self, stats: &mut [MetricStat]) {
        let column = self.column;
        let order = self.order;
        stats.sort_by(|a, b| order.apply(column.compare(a, b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(metric: &str, trigger: &str, errors: u64) -> MetricStat {
        MetricStat {
            metric: metric.to_string(),
            trigger: Trigger::named(trigger),
            current_state: Status::Ok,
            error_count: errors,
        }
    }

    fn metrics(stats: &[MetricStat]) -> Vec<&str> {
        stats.iter().map(|s| s.metric.as_str()).collect()
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::NoData).unwrap(), "\"NODATA\"");
        let parsed: Status = serde_json::from_str("\"WARN\"").unwrap();
        assert_eq!(parsed, Status::Warn);
        assert_eq!("nodata".parse::<Status>().unwrap(), Status::NoData);
    }

    #[test]
    fn default_sort_is_error_count_descending() {
        let mut rows = vec![stat("a", "t", 1), stat("b", "t", 5), stat("c", "t", 3)];
        MetricSort::default().apply(&mut rows);
        assert_eq!(metrics(&rows), vec!["b", "c", "a"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut rows = vec![stat("x", "t", 2), stat("y", "t", 2), stat("z", "t", 2)];
        let mut sort = MetricSort::default();
        sort.select(MetricColumn::Trigger);
        sort.apply(&mut rows);
        assert_eq!(metrics(&rows), vec!["x", "y", "z"]);
    }

    #[test]
    fn sort_by_trigger_name() {
        let mut rows = vec![stat("1", "beta", 0), stat("2", "alpha", 0)];
        let mut sort = MetricSort::default();
        sort.select(MetricColumn::Trigger);
        sort.apply(&mut rows);
        assert_eq!(metrics(&rows), vec!["2", "1"]);
        sort.select(MetricColumn::Trigger);
        sort.apply(&mut rows);
        assert_eq!(metrics(&rows), vec!["1", "2"]);
    }

    #[test]
    fn metric_column_parses_cli_spelling() {
        assert_eq!("error-count".parse::<MetricColumn>().unwrap(), MetricColumn::ErrorCount);
        assert!("tags".parse::<MetricColumn>().is_err());
    }

    #[test]
    fn trigger_state_tolerates_null_metrics() {
        let state: TriggerState =
            serde_json::from_str(r#"{"state":"ERROR","timestamp":10,"metrics":null}"#).unwrap();
        assert_eq!(state.state, Status::Error);
        assert!(state.metrics.is_empty());
    }

    #[test]
    fn maintenance_window_is_checked_against_now() {
        let metric = MetricState {
            maintenance: Some(100),
            ..MetricState::default()
        };
        assert!(metric.in_maintenance(99));
        assert!(!metric.in_maintenance(100));
    }
}
