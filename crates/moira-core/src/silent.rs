//! Silent patterns: temporary suppression by metric pattern or by tag.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sort::{ColumnSort, SortOrder};

/// What a silent pattern matches. Encoded as a number on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SilentPatternType {
    /// Metric-name pattern, code `0`.
    #[default]
    Pattern,
    /// Tag, code `1`.
    Tag,
}

impl SilentPatternType {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Pattern => 0,
            Self::Tag => 1,
        }
    }

    /// Page caption.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Pattern => "Silent patterns",
            Self::Tag => "Silent tags",
        }
    }
}

impl TryFrom<i64> for SilentPatternType {
    type Error = CoreError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pattern),
            1 => Ok(Self::Tag),
            _ => Err(CoreError::UnknownCode {
                kind: "silent pattern type",
                code,
            }),
        }
    }
}

impl From<SilentPatternType> for i64 {
    fn from(t: SilentPatternType) -> Self {
        t.code()
    }
}

/// A temporary suppression rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentPattern {
    /// Pattern ID; empty before creation.
    #[serde(default)]
    pub id: String,
    /// Author login.
    #[serde(default)]
    pub login: String,
    /// Metric pattern or tag.
    pub pattern: String,
    /// Creation time, unix seconds.
    #[serde(default)]
    pub created_at: i64,
    /// Expiry time, unix seconds.
    #[serde(default)]
    pub until: i64,
    /// Pattern kind; fixed at creation.
    #[serde(rename = "type", default)]
    pub kind: SilentPatternType,
}

impl SilentPattern {
    /// A new pattern of the given kind expiring at `until`.
    #[must_use]
    pub fn new(kind: SilentPatternType, pattern: impl Into<String>, until: i64) -> Self {
        Self {
            pattern: pattern.into(),
            until,
            kind,
            ..Self::default()
        }
    }

    /// True while `until` is in the future.
    #[must_use]
    pub const fn is_active(&self, now: i64) -> bool {
        self.until > now
    }

    /// Identity used for selection: the ID, or the pattern when unsaved.
    #[must_use]
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.pattern
        } else {
            &self.id
        }
    }

    /// True when the pattern or the login contains `search`.
    /// An empty search matches everything.
    #[must_use]
    pub fn matches_search(&self, search: &str) -> bool {
        search.is_empty() || self.pattern.contains(search) || self.login.contains(search)
    }
}

/// Body of the bulk silent-pattern endpoints, also the list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentPatternList {
    /// Patterns.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<SilentPattern>,
}

/// Sortable columns of the silent-pattern list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilentSortKey {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Author login.
    Login,
    /// Pattern text.
    Pattern,
}

impl SilentSortKey {
    /// Returns the key as used in the location fragment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Login => "login",
            Self::Pattern => "pattern",
        }
    }

    fn compare(self, left: &SilentPattern, right: &SilentPattern) -> Ordering {
        match self {
            Self::CreatedAt => left.created_at.cmp(&right.created_at),
            Self::Login => left.login.cmp(&right.login),
            Self::Pattern => left.pattern.cmp(&right.pattern),
        }
    }
}

impl fmt::Display for SilentSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SilentSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "login" => Ok(Self::Login),
            "pattern" => Ok(Self::Pattern),
            other => Err(CoreError::unknown("silent sort key", other)),
        }
    }
}

/// Sort state of the silent-pattern list.
pub type SilentSort = ColumnSort<SilentSortKey>;

impl Default for SilentSort {
    fn default() -> Self {
        Self::new(SilentSortKey::CreatedAt, SortOrder::Desc)
    }
}

impl SilentSort {
    /// Filters by `search` and sorts; the result borrows from `patterns`.
    #[must_use]
    pub fn view<'a>(&self, patterns: &'a [SilentPattern], search: &str) -> Vec<&'a SilentPattern> {
        let mut visible: Vec<&SilentPattern> =
            patterns.iter().filter(|p| p.matches_search(search)).collect();
        let key = self.column;
        let order = self.order;
        visible.sort_by(|a, b| order.apply(key.compare(a, b)));
        visible
    }
}
