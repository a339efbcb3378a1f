//! Search of subscriptions by contact value.

use moira_api::MoiraClient;
use moira_core::{Contact, SubscriptionFiltered};

use crate::error::{ConsoleError, Result};
use crate::screen::Screen;

/// Shortest search string sent to the server.
pub const MIN_SEARCH_LENGTH: usize = 3;

/// One search hit with the contacts that matched.
#[derive(Debug, Clone)]
pub struct SubscriptionMatch {
    /// The subscription.
    pub subscription: SubscriptionFiltered,
    /// Contacts whose value contains the search string.
    pub contacts: Vec<Contact>,
}

/// Result of the last search.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    /// The search string, lowercased.
    pub search: String,
    /// Hits in server order.
    pub matches: Vec<SubscriptionMatch>,
}

/// Controller of the subscription search screen.
#[derive(Debug)]
pub struct SubscriptionSearchContainer {
    client: MoiraClient,
    screen: Screen<SearchView>,
}

impl SubscriptionSearchContainer {
    /// Creates the controller.
    #[must_use]
    pub fn new(client: MoiraClient) -> Self {
        Self {
            client,
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<SearchView> {
        &self.screen
    }

    /// Searches subscriptions whose contacts contain `value`.
    ///
    /// Strings shorter than [`MIN_SEARCH_LENGTH`] characters are rejected
    /// without a request.
    pub async fn search(&mut self, value: &str) -> Result<&SearchView> {
        if value.chars().count() < MIN_SEARCH_LENGTH {
            return Err(ConsoleError::InvalidArgument(format!(
                "search needs at least {MIN_SEARCH_LENGTH} characters"
            )));
        }
        let ticket = self.screen.begin();
        let search = value.to_lowercase();
        let result = self
            .client
            .search_subscriptions(value)
            .await
            .map(|found| SearchView {
                matches: found
                    .list
                    .into_iter()
                    .map(|subscription| SubscriptionMatch {
                        contacts: subscription.matched_contacts(&search).into_iter().cloned().collect(),
                        subscription,
                    })
                    .collect(),
                search,
            })
            .map_err(ConsoleError::from);
        self.screen.commit(ticket, result)?;
        self.screen.require()
    }
}
