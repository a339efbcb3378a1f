//! Screen controllers.
//!
//! Each controller owns a [`MoiraClient`](moira_api::MoiraClient) and a
//! [`Screen`](crate::screen::Screen). It fetches what its screen shows and
//! performs the screen's actions, refetching afterwards.
//!
//! - [`trigger_list`] - trigger list with tag filter and paging
//! - [`trigger_view`] - one trigger with state and events
//! - [`trigger_edit`] - trigger edit and creation
//! - [`settings`] - contacts, subscriptions and global settings
//! - [`silent`] - silent patterns and silent tags
//! - [`tags`] - tag statistics
//! - [`subscription_search`] - subscriptions by contact value
//! - [`metric_stats`] - metric error statistics
//! - [`notifications`] - pending notification queue
//! - [`patterns`] - metric patterns

pub mod metric_stats;
pub mod notifications;
pub mod patterns;
pub mod settings;
pub mod silent;
pub mod subscription_search;
pub mod tags;
pub mod trigger_edit;
pub mod trigger_list;
pub mod trigger_view;

pub use metric_stats::{MetricStatsContainer, MetricStatsView};
pub use notifications::NotificationsContainer;
pub use patterns::PatternsContainer;
pub use settings::{SettingsContainer, SettingsView};
pub use silent::{SilentPatternsContainer, SilentView};
pub use subscription_search::{SearchView, SubscriptionMatch, SubscriptionSearchContainer, MIN_SEARCH_LENGTH};
pub use tags::{TagsContainer, TagsView};
pub use trigger_edit::{TriggerEditContainer, TriggerForm};
pub use trigger_list::{TagBuckets, TriggerListContainer, TriggerListLoad, TriggerListView};
pub use trigger_view::{TriggerExport, TriggerView, TriggerViewContainer};
