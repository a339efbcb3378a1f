//! Data model of the Moira alerting console.
//!
//! `moira-core` holds the records exchanged with the Moira API together with
//! the small pieces of client-side logic that operate on them.
//!
//! # Features
//!
//! - **Records**: triggers, contacts, subscriptions, silent patterns, tags,
//!   events, notifications, settings and the UI configuration
//! - **Partial updates**: [`TriggerPatch`], [`ContactPatch`] and
//!   [`SubscriptionPatch`] with pure `merged` functions
//! - **Special tags**: `DEGRADATION` and `ERROR` kept in sync with the
//!   subscription flags they encode
//! - **Formatting**: [`round_value`] renders metric values with SI suffixes
//! - **Export**: [`export_trigger`] renders a trigger as projected YAML
//!
//! # Example
//!
//! ```rust
//! use moira_core::{round_value, Trigger, TriggerPatch};
//!
//! let trigger = Trigger::named("cpu");
//! let patch = TriggerPatch {
//!     warn_value: Some(Some(90.0)),
//!     ..TriggerPatch::default()
//! };
//! let updated = trigger.merged(&patch);
//! assert_eq!(updated.warn_value, Some(90.0));
//!
//! assert_eq!(round_value(Some(1234.0), true), "1.23 K");
//! assert_eq!(round_value(None, false), "");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod contact;
mod de;
pub mod error;
pub mod event;
pub mod export;
pub mod format;
pub mod maintenance;
pub mod metric;
pub mod schedule;
pub mod settings;
pub mod silent;
pub mod sort;
pub mod subscription;
pub mod tag;
pub mod trigger;

pub use contact::{
    normalize_value_for_api, normalize_value_for_ui, Contact, ContactCreateInfo, ContactList,
    ContactPatch, ContactType,
};
pub use error::{CoreError, Result};
pub use event::{Event, EventList, Notification, NotificationList};
pub use export::{export_file_name, export_trigger, project_for_export, ExportFormat};
pub use format::{round_value, PLACEHOLDER};
pub use maintenance::{Maintenance, TimeOffset};
pub use metric::{MetricColumn, MetricSort, MetricStat, MetricState, MetricStats, Status, TriggerState};
pub use schedule::{Schedule, ScheduleDay};
pub use settings::{ContactConfig, GlobalSettings, NotificationsSettings, Settings, UiConfig};
pub use silent::{SilentPattern, SilentPatternList, SilentPatternType, SilentSort, SilentSortKey};
pub use sort::{ColumnSort, SortOrder};
pub use subscription::{
    is_special_tag, next_escalation_offset, Escalation, EscalationFiltered, Subscription,
    SubscriptionCreateInfo, SubscriptionFiltered, SubscriptionPatch, SubscriptionSearchResult,
    DEGRADATION_TAG, ERROR_TAG, SPECIAL_TAGS,
};
pub use tag::{Pattern, PatternList, TagList, TagStat, TagStatList};
pub use trigger::{
    SaturationType, SaveTriggerResponse, Trigger, TriggerList, TriggerPatch, TriggerSaturation,
    TriggerType,
};
