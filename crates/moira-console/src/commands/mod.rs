//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command on top of the screen
//! controllers in [`crate::containers`]:
//! - [`triggers`] - Trigger list
//! - [`trigger`] - One trigger: show, edit, export, maintenance
//! - [`contacts`] - Delivery channels
//! - [`subscriptions`] - Subscriptions and subscription search
//! - [`silent`] - Silent patterns and tags
//! - [`tags`] - Tag statistics
//! - [`patterns`] - Metric patterns
//! - [`notifications`] - Pending notifications
//! - [`stats`] - Metric error statistics
//! - [`global`] - Global notification switch

pub mod contacts;
pub mod global;
pub mod notifications;
pub mod patterns;
pub mod silent;
pub mod stats;
pub mod subscriptions;
pub mod tags;
pub mod trigger;
pub mod triggers;

pub use contacts::ContactsCommand;
pub use global::GlobalCommand;
pub use notifications::NotificationsCommand;
pub use patterns::PatternsCommand;
pub use silent::SilentCommand;
pub use stats::StatsCommand;
pub use subscriptions::SubscriptionsCommand;
pub use tags::TagsCommand;
pub use trigger::TriggerCommand;
pub use triggers::TriggersCommand;
