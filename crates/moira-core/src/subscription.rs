//! Subscriptions, escalations and the special tags that double as flags.

use serde::{Deserialize, Serialize};

use crate::contact::Contact;
use crate::schedule::Schedule;

/// Tag that marks "notify only when the trigger degrades".
pub const DEGRADATION_TAG: &str = "DEGRADATION";

/// Tag that marks "do not send WARN notifications".
pub const ERROR_TAG: &str = "ERROR";

/// Tags with behavioral meaning on subscriptions.
pub const SPECIAL_TAGS: [&str; 2] = [DEGRADATION_TAG, ERROR_TAG];

/// Offset step added when a new escalation is appended, in minutes.
pub const ESCALATION_OFFSET_STEP: i64 = 20;

/// True when the tag is one of [`SPECIAL_TAGS`].
#[must_use]
pub fn is_special_tag(tag: &str) -> bool {
    SPECIAL_TAGS.contains(&tag)
}

/// A delayed secondary notification step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    /// Delay after the first notification.
    #[serde(default)]
    pub offset_in_minutes: i64,
    /// Contact IDs to notify.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<String>,
}

/// Offset for an escalation appended after `escalations`.
#[must_use]
pub fn next_escalation_offset(escalations: &[Escalation]) -> i64 {
    escalations
        .iter()
        .map(|e| e.offset_in_minutes)
        .fold(0, i64::max)
        + ESCALATION_OFFSET_STEP
}

/// Binding of tags and a schedule to a set of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription ID.
    pub id: String,
    /// Delivery schedule.
    #[serde(default)]
    pub sched: Schedule,
    /// Tags a trigger must carry, all of them.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub tags: Vec<String>,
    /// Group bursts of events into a single message.
    #[serde(default)]
    pub throttling: bool,
    /// Contact IDs.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<String>,
    /// Whether notifications are sent.
    #[serde(default)]
    pub enabled: bool,
    /// Owner login.
    #[serde(default)]
    pub user: String,
    /// Escalation steps.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub escalations: Vec<Escalation>,
    /// Explicit "degraded only" flag; absent in legacy records.
    #[serde(
        rename = "sendNotificationsOnTriggerDegradedOnly",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub degraded_only: Option<bool>,
    /// Explicit "no WARN notifications" flag; absent in legacy records.
    #[serde(
        rename = "doNotSendWarnNotifications",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub no_warn_notifications: Option<bool>,
}

impl Subscription {
    /// Fills absent flags from the special tags.
    ///
    /// Explicit flags are left untouched whatever the tags say.
    pub fn normalize_legacy_flags(&mut self) {
        if self.degraded_only.is_none() {
            self.degraded_only = Some(self.has_tag(DEGRADATION_TAG));
        }
        if self.no_warn_notifications.is_none() {
            self.no_warn_notifications = Some(self.has_tag(ERROR_TAG));
        }
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Reads the "degraded only" flag from the tag or the explicit field.
    #[must_use]
    pub fn is_degraded_only(&self) -> bool {
        self.has_tag(DEGRADATION_TAG) || self.degraded_only == Some(true)
    }

    /// Reads the "no WARN notifications" flag from the tag or the explicit field.
    #[must_use]
    pub fn is_no_warn_notifications(&self) -> bool {
        self.has_tag(ERROR_TAG) || self.no_warn_notifications == Some(true)
    }

    /// Sets the "degraded only" flag and keeps the special tag in sync.
    pub fn set_degraded_only(&mut self, on: bool) {
        set_tag(&mut self.tags, DEGRADATION_TAG, on);
        self.degraded_only = Some(on);
    }

    /// Sets the "no WARN notifications" flag and keeps the special tag in sync.
    pub fn set_no_warn_notifications(&mut self, on: bool) {
        set_tag(&mut self.tags, ERROR_TAG, on);
        self.no_warn_notifications = Some(on);
    }

    /// Tags without the special ones.
    pub fn user_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| !is_special_tag(t))
    }

    /// Replaces the user-visible tags and keeps present special tags.
    pub fn set_user_tags(&mut self, tags: &[String]) {
        self.tags = merge_user_tags(&self.tags, tags);
    }

    /// Returns a copy with the patch applied.
    #[must_use]
    pub fn merged(&self, patch: &SubscriptionPatch) -> Self {
        let mut next = self.clone();
        if let Some(sched) = &patch.sched {
            next.sched.clone_from(sched);
        }
        if let Some(tags) = &patch.tags {
            next.set_user_tags(tags);
        }
        if let Some(throttling) = patch.throttling {
            next.throttling = throttling;
        }
        if let Some(contacts) = &patch.contacts {
            next.contacts.clone_from(contacts);
        }
        if let Some(enabled) = patch.enabled {
            next.enabled = enabled;
        }
        if let Some(escalations) = &patch.escalations {
            next.escalations.clone_from(escalations);
        }
        if let Some(on) = patch.degraded_only {
            next.set_degraded_only(on);
        }
        if let Some(on) = patch.no_warn_notifications {
            next.set_no_warn_notifications(on);
        }
        next
    }
}

fn set_tag(tags: &mut Vec<String>, tag: &str, on: bool) {
    let present = tags.iter().any(|t| t == tag);
    if on && !present {
        tags.push(tag.to_string());
    } else if !on {
        tags.retain(|t| t != tag);
    }
}

fn merge_user_tags(current: &[String], user_tags: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(user_tags.len() + SPECIAL_TAGS.len());
    for tag in user_tags {
        if !is_special_tag(tag) && !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    for special in SPECIAL_TAGS {
        if current.iter().any(|t| t == special) {
            tags.push(special.to_string());
        }
    }
    tags
}

/// Payload of a subscription creation request. Has no `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCreateInfo {
    /// Delivery schedule.
    pub sched: Schedule,
    /// Tags.
    pub tags: Vec<String>,
    /// Group bursts of events.
    pub throttling: bool,
    /// Contact IDs.
    pub contacts: Vec<String>,
    /// Whether notifications are sent.
    pub enabled: bool,
    /// Owner login.
    pub user: String,
    /// Escalation steps.
    pub escalations: Vec<Escalation>,
}

impl SubscriptionCreateInfo {
    /// A fresh enabled subscription with the default schedule.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            sched: Schedule::default(),
            tags: Vec::new(),
            throttling: true,
            contacts: Vec::new(),
            enabled: true,
            user: user.into(),
            escalations: Vec::new(),
        }
    }
}

/// A partial subscription edit.
///
/// `tags` carries user-visible tags only; special tags follow the two flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    /// New schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sched: Option<Schedule>,
    /// New user-visible tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New throttling flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttling: Option<bool>,
    /// New contacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<String>>,
    /// New enabled flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New escalations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalations: Option<Vec<Escalation>>,
    /// New "degraded only" flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_only: Option<bool>,
    /// New "no WARN notifications" flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_warn_notifications: Option<bool>,
}

/// An escalation with resolved contacts, as returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationFiltered {
    /// Escalation ID.
    #[serde(default)]
    pub id: String,
    /// Delay after the first notification.
    #[serde(default)]
    pub offset_in_minutes: i64,
    /// Resolved contacts.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<Contact>,
}

/// A subscription with resolved contacts and match markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionFiltered {
    /// Subscription ID.
    #[serde(default)]
    pub id: String,
    /// Whether notifications are sent.
    #[serde(default)]
    pub enabled: bool,
    /// Tags.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub tags: Vec<String>,
    /// Owner login.
    #[serde(default)]
    pub user: String,
    /// Resolved contacts.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<Contact>,
    /// Escalations with resolved contacts.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub escalations: Vec<EscalationFiltered>,
    /// Which escalations matched the search, by position.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub matched_esc: Vec<bool>,
    /// Whether the subscription's own contacts matched.
    #[serde(default)]
    pub matched_sub: bool,
}

impl SubscriptionFiltered {
    /// Contacts whose value contains `needle`, from the subscription and
    /// from every matched escalation, in that order.
    #[must_use]
    pub fn matched_contacts(&self, needle: &str) -> Vec<&Contact> {
        let own = self
            .contacts
            .iter()
            .filter(|_| self.matched_sub)
            .filter(|c| c.value_contains(needle));
        let escalated = self
            .escalations
            .iter()
            .enumerate()
            .filter(|(i, _)| self.matched_esc.get(*i).copied().unwrap_or(false))
            .flat_map(|(_, e)| e.contacts.iter())
            .filter(|c| c.value_contains(needle));
        own.chain(escalated).collect()
    }
}

/// Response of `GET /subscription/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSearchResult {
    /// Matching subscriptions.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<SubscriptionFiltered>,
}
