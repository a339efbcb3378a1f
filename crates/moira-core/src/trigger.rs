//! Triggers: alert rules over one or more metric targets.
//!
//! - [`Trigger`]: the rule as stored by the service
//! - [`TriggerPatch`]: a partial edit merged with [`Trigger::merged`]
//! - [`TriggerList`]: one page of the trigger listing
//! - [`TriggerSaturation`]: auxiliary enrichment/check rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metric::{Status, TriggerState};
use crate::schedule::Schedule;

/// How threshold values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Alert when the value grows above the thresholds.
    #[default]
    Rising,
    /// Alert when the value falls below the thresholds.
    Falling,
    /// Evaluate the boolean expression instead of thresholds.
    Expression,
}

impl TriggerType {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Expression => "expression",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a saturation rule.
///
/// Names this console does not know are kept in [`SaturationType::Unknown`]
/// so that such triggers still load and save unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaturationType {
    /// Check that a remote port is reachable.
    CheckPort,
    /// Render a template in the trigger description.
    RenderDescription,
    /// A kind introduced by a newer server.
    Unknown(String),
}

impl SaturationType {
    /// All known saturation types.
    pub const ALL: [Self; 2] = [Self::CheckPort, Self::RenderDescription];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckPort => "check-port",
            Self::RenderDescription => "render-description",
            Self::Unknown(name) => name,
        }
    }

    /// Human-readable description; unknown kinds describe themselves by name.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::CheckPort => "Check remote port.",
            Self::RenderDescription => "Render a template in the trigger description.",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for SaturationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "check-port" => Self::CheckPort,
            "render-description" => Self::RenderDescription,
            _ => Self::Unknown(s),
        }
    }
}

impl From<SaturationType> for String {
    fn from(t: SaturationType) -> Self {
        match t {
            SaturationType::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for SaturationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// An auxiliary rule attached to a trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerSaturation {
    /// Rule kind; unset while the rule is being edited.
    #[serde(rename = "type")]
    pub kind: Option<SaturationType>,
    /// Fallback value used when the rule fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Type-specific parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_parameters: Option<Map<String, Value>>,
}

/// An alert rule.
///
/// Fields the console does not model are kept in `extra` so that a trigger
/// fetched from the service can be written back without losing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger ID; empty for a trigger that was never saved.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Metric query expressions, `t1`, `t2`, ... in expressions.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub targets: Vec<String>,
    /// Tags used for filtering and routing.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub tags: Vec<String>,
    /// Warning threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_value: Option<f64>,
    /// Error threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_value: Option<f64>,
    /// Threshold direction.
    #[serde(default)]
    pub trigger_type: TriggerType,
    /// Seconds without data before `ttl_state` is applied.
    #[serde(default)]
    pub ttl: i64,
    /// State set when no data arrives within `ttl`.
    #[serde(default = "default_ttl_state")]
    pub ttl_state: Status,
    /// Watch schedule.
    #[serde(default)]
    pub sched: Schedule,
    /// Boolean expression; overrides thresholds when non-empty.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub expression: String,
    /// Metric-name patterns derived from the targets.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub patterns: Vec<String>,
    /// Evaluated against the remote storage.
    #[serde(default)]
    pub is_remote: bool,
    /// Suppress notifications for newly appearing metrics.
    #[serde(default)]
    pub mute_new_metrics: bool,
    /// Throttling end, unix seconds.
    #[serde(default)]
    pub throttling: i64,
    /// Whether any subscription escalates this trigger.
    #[serde(default)]
    pub has_escalations: bool,
    /// Grafana panel URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,
    /// Seconds a state must hold before an event is raised.
    #[serde(default)]
    pub pending_interval: i64,
    /// Saturation rules.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub saturation: Vec<TriggerSaturation>,
    /// Last check, present in list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<TriggerState>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn default_ttl_state() -> Status {
    Status::NoData
}

impl Trigger {
    /// Creates an unsaved trigger with the given name and defaults elsewhere.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ttl: 600,
            ttl_state: Status::NoData,
            ..Self::default()
        }
    }

    /// True when the expression drives evaluation instead of thresholds.
    #[must_use]
    pub fn uses_expression(&self) -> bool {
        !self.expression.trim().is_empty()
    }

    /// True when more than one target or an expression is configured.
    #[must_use]
    pub fn is_advanced(&self) -> bool {
        self.targets.len() > 1 || self.uses_expression()
    }

    /// Returns a copy with the patch applied.
    #[must_use]
    pub fn merged(&self, patch: &TriggerPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name.clone_from(name);
        }
        if let Some(desc) = &patch.desc {
            next.desc.clone_from(desc);
        }
        if let Some(targets) = &patch.targets {
            next.targets.clone_from(targets);
        }
        if let Some(tags) = &patch.tags {
            next.tags.clone_from(tags);
        }
        if let Some(warn) = patch.warn_value {
            next.warn_value = warn;
        }
        if let Some(error) = patch.error_value {
            next.error_value = error;
        }
        if let Some(kind) = patch.trigger_type {
            next.trigger_type = kind;
        }
        if let Some(ttl) = patch.ttl {
            next.ttl = ttl;
        }
        if let Some(state) = patch.ttl_state {
            next.ttl_state = state;
        }
        if let Some(sched) = &patch.sched {
            next.sched.clone_from(sched);
        }
        if let Some(expression) = &patch.expression {
            next.expression.clone_from(expression);
        }
        if let Some(remote) = patch.is_remote {
            next.is_remote = remote;
        }
        if let Some(mute) = patch.mute_new_metrics {
            next.mute_new_metrics = mute;
        }
        if let Some(dashboard) = &patch.dashboard {
            next.dashboard.clone_from(dashboard);
        }
        if let Some(pending) = patch.pending_interval {
            next.pending_interval = pending;
        }
        if let Some(saturation) = &patch.saturation {
            next.saturation.clone_from(saturation);
        }
        next
    }
}

/// A partial trigger edit. `None` leaves a field untouched; for nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, deserialize_with = "crate::de::double_option", skip_serializing_if = "Option::is_none")]
    pub desc: Option<Option<String>>,
    /// New target list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    /// New tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New warning threshold.
    #[serde(default, deserialize_with = "crate::de::double_option", skip_serializing_if = "Option::is_none")]
    pub warn_value: Option<Option<f64>>,
    /// New error threshold.
    #[serde(default, deserialize_with = "crate::de::double_option", skip_serializing_if = "Option::is_none")]
    pub error_value: Option<Option<f64>>,
    /// New threshold direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<TriggerType>,
    /// New TTL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// New TTL state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_state: Option<Status>,
    /// New schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sched: Option<Schedule>,
    /// New expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// New remote flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_remote: Option<bool>,
    /// New mute flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_new_metrics: Option<bool>,
    /// New dashboard URL.
    #[serde(default, deserialize_with = "crate::de::double_option", skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Option<String>>,
    /// New pending interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_interval: Option<i64>,
    /// New saturation rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<Vec<TriggerSaturation>>,
}

impl TriggerPatch {
    /// True when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One page of `GET /trigger/page`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerList {
    /// Triggers on this page.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<Trigger>,
    /// Total number of matching triggers.
    #[serde(default)]
    pub total: u64,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    /// Page size.
    #[serde(default)]
    pub size: u64,
}

impl TriggerList {
    /// Number of pages for the total count; never less than one.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total.div_ceil(self.size).max(1)
    }
}

/// Response of trigger create/update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTriggerResponse {
    /// ID of the saved trigger.
    #[serde(default)]
    pub id: String,
    /// Server message.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_keeps_unknown_fields() {
        let json = r#"{"id":"t1","name":"cpu","targets":["a.b"],"tags":["x"],"alone_metrics":{"t1":true}}"#;
        let trigger: Trigger = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.extra["alone_metrics"]["t1"], true);

        let back = serde_json::to_value(&trigger).unwrap();
        assert_eq!(back["alone_metrics"]["t1"], true);
    }

    #[test]
    fn trigger_tolerates_nulls() {
        let trigger: Trigger =
            serde_json::from_str(r#"{"name":"n","targets":null,"expression":null,"saturation":null}"#)
                .unwrap();
        assert!(trigger.targets.is_empty());
        assert!(trigger.expression.is_empty());
        assert_eq!(trigger.ttl_state, Status::NoData);
    }

    #[test]
    fn merge_only_touches_patched_fields() {
        let base = Trigger {
            id: "t1".into(),
            name: "old".into(),
            warn_value: Some(1.0),
            tags: vec!["a".into()],
            ..Trigger::default()
        };
        let patch = TriggerPatch {
            name: Some("new".into()),
            warn_value: Some(None),
            ..TriggerPatch::default()
        };

        let next = base.merged(&patch);
        assert_eq!(next.name, "new");
        assert_eq!(next.warn_value, None);
        assert_eq!(next.tags, vec!["a".to_string()]);
        assert_eq!(next.id, "t1");
        // merge is pure
        assert_eq!(base.name, "old");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: TriggerPatch = serde_json::from_str(r#"{"warn_value":null}"#).unwrap();
        assert_eq!(patch.warn_value, Some(None));
        assert_eq!(patch.error_value, None);
        assert!(!patch.is_empty());

        let empty: TriggerPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        assert!(serde_json::from_str::<TriggerPatch>(r#"{"nmae":"typo"}"#).is_err());
    }

    #[test]
    fn page_count_rounds_up() {
        let list = TriggerList {
            total: 41,
            size: 20,
            ..TriggerList::default()
        };
        assert_eq!(list.page_count(), 3);

        let empty = TriggerList::default();
        assert_eq!(empty.page_count(), 1);
    }

    #[test]
    fn expression_mode_detection() {
        let mut trigger = Trigger::named("t");
        trigger.targets = vec!["a".into()];
        assert!(!trigger.is_advanced());
        trigger.expression = "t1 > 10 ? ERROR : OK".into();
        assert!(trigger.uses_expression());
        assert!(trigger.is_advanced());
    }

    #[test]
    fn saturation_type_round_trip_names() {
        let sat: TriggerSaturation = serde_json::from_str(r#"{"type":"check-port"}"#).unwrap();
        assert_eq!(sat.kind, Some(SaturationType::CheckPort));
        let unset: TriggerSaturation = serde_json::from_str(r#"{"type":null}"#).unwrap();
        assert_eq!(unset.kind, None);
        assert_eq!(
            "render-description".parse::<SaturationType>().unwrap(),
            SaturationType::RenderDescription
        );
    }

    #[test]
    fn unknown_saturation_type_is_kept() {
        let trigger: Trigger =
            serde_json::from_str(r#"{"name":"x","saturation":[{"type":"future-kind","fallback":"1"}]}"#).unwrap();
        let kind = trigger.saturation[0].kind.clone();
        assert_eq!(kind, Some(SaturationType::Unknown("future-kind".into())));

        let json = serde_json::to_value(&trigger).unwrap();
        assert_eq!(json["saturation"][0]["type"], "future-kind");
    }
}
