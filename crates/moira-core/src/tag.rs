//! Tags and metric-name patterns.

use serde::{Deserialize, Serialize};

use crate::subscription::Subscription;
use crate::trigger::Trigger;

/// Response of `GET /tag`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagList {
    /// Tag names.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<String>,
}

impl TagList {
    /// True when the tag is known.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.list.iter().any(|t| t == tag)
    }

    /// Keeps only the tags from `tags` that are known, in their given order.
    #[must_use]
    pub fn intersect(&self, tags: &[String]) -> Vec<String> {
        tags.iter().filter(|t| self.contains(t)).cloned().collect()
    }
}

/// Usage of one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStat {
    /// Tag name.
    pub name: String,
    /// IDs of triggers carrying the tag.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub triggers: Vec<String>,
    /// Subscriptions that reference the tag.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub subscriptions: Vec<Subscription>,
}

/// Response of `GET /tag/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStatList {
    /// Tag statistics.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<TagStat>,
}

impl TagStatList {
    /// Sorts by tag name.
    pub fn sort_by_name(&mut self) {
        self.list.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// A metric-name pattern with the triggers and metrics it covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Pattern text.
    pub pattern: String,
    /// Triggers using the pattern.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub triggers: Vec<Trigger>,
    /// Metrics currently matched.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub metrics: Vec<String>,
}

/// Response of `GET /pattern`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternList {
    /// Patterns.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<Pattern>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_drops_unknown_tags() {
        let known = TagList {
            list: vec!["a".into(), "b".into()],
        };
        assert_eq!(known.intersect(&["b".into(), "zzz".into()]), vec!["b".to_string()]);
    }

    #[test]
    fn tag_stats_sort_by_name() {
        let mut stats: TagStatList =
            serde_json::from_str(r#"{"list":[{"name":"b","triggers":null},{"name":"a"}]}"#).unwrap();
        stats.sort_by_name();
        assert_eq!(stats.list[0].name, "a");
        assert!(stats.list[1].triggers.is_empty());
    }

    #[test]
    fn pattern_list_parses() {
        let list: PatternList = serde_json::from_str(
            r#"{"list":[{"pattern":"a.*","triggers":[{"id":"t","name":"T"}],"metrics":["a.b"]}]}"#,
        )
        .unwrap();
        assert_eq!(list.list[0].triggers[0].name, "T");
    }
}
