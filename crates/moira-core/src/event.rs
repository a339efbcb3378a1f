//! Trigger events and the notification queue.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contact::Contact;
use crate::metric::Status;

/// A state change of one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// New state.
    #[serde(default)]
    pub state: Status,
    /// Previous state.
    #[serde(default)]
    pub old_state: Status,
    /// Time of the change, unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Value that caused the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Previous value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<f64>,
    /// Metric name.
    #[serde(default)]
    pub metric: String,
    /// Message attached by the checker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Owning trigger.
    #[serde(default)]
    pub trigger_id: String,
    /// Subscription that produced a notification for this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_id: Option<String>,
    /// Why the event was muted, as a code.
    #[serde(default)]
    pub muted_reason: i64,
    /// Why the event was muted, as text.
    #[serde(default)]
    pub muted_verbose: String,
}

/// One page of `GET /event/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    /// Total number of events.
    #[serde(default)]
    pub total: u64,
    /// Events on this page.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<Event>,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    /// Page size.
    #[serde(default)]
    pub size: u64,
}

impl EventList {
    /// Number of pages; never less than one.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total.div_ceil(self.size).max(1)
    }
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Scheduled send time, unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Event being delivered.
    #[serde(default)]
    pub event: Event,
    /// Trigger summary; kept as raw JSON.
    #[serde(default)]
    pub trigger: Map<String, Value>,
    /// Recipient.
    pub contact: Contact,
    /// Whether the notification was throttled.
    #[serde(default)]
    pub throttled: bool,
    /// Failed send attempts.
    #[serde(default)]
    pub send_fail: i64,
}

impl Notification {
    /// Identifier accepted by `DELETE /notification?id=`.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}{}{}",
            self.timestamp,
            self.contact.id,
            self.event.sub_id.as_deref().unwrap_or_default()
        )
    }
}

/// Response of `GET /notification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationList {
    /// Total number of queued notifications.
    #[serde(default)]
    pub total: u64,
    /// Notifications.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<Notification>,
}
