//! Subscription form rules.

use moira_core::Escalation;

use crate::builder::ValidationBuilder;
use crate::error::ValidationError;

/// Shown when a subscription or escalation has no contacts.
pub const NO_CONTACTS: &str = "Please add one or more delivery channels";

/// Shown when a subscription has no tags.
pub const NO_TAGS: &str = "Please add one or more tags";

/// The fields of a subscription the rules look at.
///
/// Both stored subscriptions and creation payloads are checked through this
/// view so the rules stay identical for add and update.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionForm<'a> {
    /// Contact IDs.
    pub contacts: &'a [String],
    /// Tags, special ones included.
    pub tags: &'a [String],
    /// Escalation steps.
    pub escalations: &'a [Escalation],
}

impl<'a> From<&'a moira_core::Subscription> for SubscriptionForm<'a> {
    fn from(s: &'a moira_core::Subscription) -> Self {
        Self {
            contacts: &s.contacts,
            tags: &s.tags,
            escalations: &s.escalations,
        }
    }
}

impl<'a> From<&'a moira_core::SubscriptionCreateInfo> for SubscriptionForm<'a> {
    fn from(s: &'a moira_core::SubscriptionCreateInfo) -> Self {
        Self {
            contacts: &s.contacts,
            tags: &s.tags,
            escalations: &s.escalations,
        }
    }
}

/// Validates a subscription before it is sent.
pub fn validate_subscription<'a>(form: impl Into<SubscriptionForm<'a>>) -> Result<(), Vec<ValidationError>> {
    let form = form.into();
    let mut builder = ValidationBuilder::new()
        .validate_not_empty_list("contacts", form.contacts, NO_CONTACTS)
        .validate_not_empty_list("tags", form.tags, NO_TAGS);

    for (i, escalation) in form.escalations.iter().enumerate() {
        builder = builder.validate_not_empty_list(
            &format!("escalations[{i}].contacts"),
            &escalation.contacts,
            NO_CONTACTS,
        );
    }
    builder.finish()
}
