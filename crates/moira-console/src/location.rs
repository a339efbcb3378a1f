//! View state mirrored into the location query string.
//!
//! Reloading a location or moving back and forward through history must
//! reproduce the same view, so every filter a list screen applies is encoded
//! here. Arrays use the index form (`tags[0]=a`).

use moira_api::Query;
use moira_core::{SilentSort, SilentSortKey, SortOrder};
use serde::{Deserialize, Serialize};

use crate::filters::FilterDefaults;

/// Default statistics window: one day.
pub const DEFAULT_INTERVAL_LENGTH: u64 = 60 * 60 * 24;

/// Default auto-refresh period in seconds.
pub const DEFAULT_AUTO_REFRESH_PERIOD: u64 = 60;

fn flag(query: &Query, key: &str) -> bool {
    query.get(key) == Some("true")
}

/// Filters of the trigger list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerListSearch {
    /// One-based page number.
    pub page: u64,
    /// Selected tags.
    pub tags: Vec<String>,
    /// Show only triggers with problems.
    pub only_problems: bool,
    /// Name filter; empty when unset.
    pub trigger_name: String,
}

impl Default for TriggerListSearch {
    fn default() -> Self {
        Self {
            page: 1,
            tags: Vec::new(),
            only_problems: false,
            trigger_name: String::new(),
        }
    }
}

impl TriggerListSearch {
    /// Parses a location query.
    ///
    /// Non-digits are stripped from the page and anything that does not
    /// leave a positive number falls back to page 1.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = Query::parse(query);
        let page = query
            .get("page")
            .map(|p| p.chars().filter(char::is_ascii_digit).collect::<String>())
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|&p| p > 0)
            .unwrap_or(1);
        Self {
            page,
            tags: query.get_list("tags"),
            only_problems: flag(&query, "onlyProblems"),
            trigger_name: query.get("triggerName").unwrap_or_default().to_string(),
        }
    }

    /// Renders the location query.
    #[must_use]
    pub fn encode(&self) -> String {
        Query::new()
            .param("onlyProblems", self.only_problems)
            .param("page", self.page)
            .list("tags", &self.tags)
            .opt_param("triggerName", Some(&self.trigger_name).filter(|n| !n.is_empty()))
            .encode()
    }

    /// Fills filters the location leaves unset from the stored defaults.
    ///
    /// Returns the search to redirect to, or `None` when the location
    /// already says everything the defaults would.
    #[must_use]
    pub fn with_defaults(&self, defaults: &FilterDefaults) -> Option<Self> {
        let mut resolved = self.clone();
        let mut changed = false;
        if self.tags.is_empty() && !defaults.tags.is_empty() {
            resolved.tags.clone_from(&defaults.tags);
            changed = true;
        }
        if !self.only_problems && defaults.only_problems {
            resolved.only_problems = true;
            changed = true;
        }
        changed.then_some(resolved)
    }

    /// Zero-based page index used by the API.
    #[must_use]
    pub const fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

/// Filters of the metric statistics screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricStatsSearch {
    /// Selected tags.
    pub tags: Vec<String>,
    /// Count only problem metrics.
    pub only_problems: bool,
    /// Statistics window in seconds.
    pub interval_length: u64,
    /// Refresh period in seconds; `0` disables refreshing.
    pub auto_refresh_period: u64,
}

impl Default for MetricStatsSearch {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            only_problems: false,
            interval_length: DEFAULT_INTERVAL_LENGTH,
            auto_refresh_period: DEFAULT_AUTO_REFRESH_PERIOD,
        }
    }
}

impl MetricStatsSearch {
    /// Parses a location query. A zero or unparsable window falls back to
    /// one day; an unparsable refresh period falls back to 60 seconds while
    /// an explicit `0` is kept.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = Query::parse(query);
        Self {
            tags: query.get_list("tags"),
            only_problems: flag(&query, "onlyProblems"),
            interval_length: query
                .get("intervalLength")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(DEFAULT_INTERVAL_LENGTH),
            auto_refresh_period: query
                .get("autoRefreshPeriod")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_AUTO_REFRESH_PERIOD),
        }
    }

    /// Renders the location query.
    #[must_use]
    pub fn encode(&self) -> String {
        Query::new()
            .param("autoRefreshPeriod", self.auto_refresh_period)
            .param("intervalLength", self.interval_length)
            .param("onlyProblems", self.only_problems)
            .list("tags", &self.tags)
            .encode()
    }
}

/// Parses the `sort_key=..&sort_order=..` fragment of the silent-pattern
/// screens. Unknown values fall back to `created_at` and `desc`.
#[must_use]
pub fn parse_silent_sort(fragment: &str) -> SilentSort {
    let query = Query::parse(fragment.trim_start_matches('#'));
    let default = SilentSort::default();
    let column = query
        .get("sort_key")
        .and_then(|k| k.parse::<SilentSortKey>().ok())
        .unwrap_or(default.column);
    let order = query
        .get("sort_order")
        .and_then(|o| o.parse::<SortOrder>().ok())
        .unwrap_or(default.order);
    SilentSort::new(column, order)
}

/// Renders the silent-pattern sort fragment.
#[must_use]
pub fn encode_silent_sort(sort: &SilentSort) -> String {
    Query::new()
        .param("sort_key", sort.column)
        .param("sort_order", sort.order)
        .encode()
}
