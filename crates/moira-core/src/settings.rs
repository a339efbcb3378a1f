//! User settings, global settings and the UI configuration.

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, ContactType};
use crate::subscription::Subscription;

/// Response of `GET /user/settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Current user.
    #[serde(default)]
    pub login: String,
    /// Whether the user may change global settings.
    #[serde(rename = "isSuperUser", default)]
    pub is_super_user: bool,
    /// The user's contacts.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<Contact>,
    /// The user's subscriptions.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub subscriptions: Vec<Subscription>,
}

impl Settings {
    /// Applies [`Subscription::normalize_legacy_flags`] to every subscription.
    pub fn normalize_legacy_flags(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.normalize_legacy_flags();
        }
    }

    /// Finds a contact by ID.
    #[must_use]
    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Tags of all subscriptions, deduplicated, in first-seen order.
    #[must_use]
    pub fn subscribed_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.subscriptions.iter().flat_map(|s| s.tags.iter()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}

/// Notification kill switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsSettings {
    /// When true, no notifications are sent at all.
    #[serde(default)]
    pub disabled: bool,
}

/// Response of `GET /global-settings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Notification switch.
    #[serde(default)]
    pub notifications: NotificationsSettings,
}

impl GlobalSettings {
    /// Returns the settings with the kill switch flipped.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self {
            notifications: NotificationsSettings {
                disabled: !self.notifications.disabled,
            },
        }
    }
}

/// Server-side description of a contact type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Contact type.
    #[serde(rename = "type")]
    pub kind: ContactType,
    /// Regex the value must match, for types without built-in rules.
    #[serde(default)]
    pub validation: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Input help.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Whether a fallback value may be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_have_fallback_value: Option<bool>,
}

impl ContactConfig {
    /// A config entry with no validation rule.
    #[must_use]
    pub fn new(kind: ContactType) -> Self {
        Self {
            kind,
            validation: String::new(),
            title: None,
            help: None,
            can_have_fallback_value: None,
        }
    }

    /// Whether a fallback value may be set.
    #[must_use]
    pub fn allows_fallback(&self) -> bool {
        self.can_have_fallback_value.unwrap_or(false)
    }

    /// Title, or the type caption when unset.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.kind.caption())
    }
}

/// Response of `GET /config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Support address shown to users.
    #[serde(rename = "supportEmail", default)]
    pub support_email: String,
    /// Available contact types.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub contacts: Vec<ContactConfig>,
    /// Allowed Grafana dashboard URL prefixes.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub grafana_prefixes: Vec<String>,
}

impl UiConfig {
    /// Finds the descriptor of a contact type.
    #[must_use]
    pub fn contact_config(&self, kind: &ContactType) -> Option<&ContactConfig> {
        self.contacts.iter().find(|c| c.kind == *kind)
    }
}
