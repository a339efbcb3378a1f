//! Tag statistics screen.

use moira_api::MoiraClient;
use moira_core::{Contact, TagStat};

use crate::error::{ConsoleError, Result};
use crate::screen::Screen;

/// Loaded tag statistics.
#[derive(Debug, Clone, Default)]
pub struct TagsView {
    /// Tags with their triggers and subscriptions, sorted by name.
    pub tags: Vec<TagStat>,
    /// All contacts, to resolve subscription contact IDs.
    pub contacts: Vec<Contact>,
}

/// Controller of the tag statistics screen.
#[derive(Debug)]
pub struct TagsContainer {
    client: MoiraClient,
    screen: Screen<TagsView>,
}

impl TagsContainer {
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
    pub const fn screen(&self) -> &Screen<TagsView> {
        &self.screen
    }

    /// Fetches tag statistics and contacts.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.screen.begin();
        let result = async {
            let mut stats = self.client.get_tag_stats().await?;
            stats.sort_by_name();
            let contacts = self.client.get_contact_list().await?;
            Ok::<_, ConsoleError>(TagsView {
                tags: stats.list,
                contacts: contacts.list,
            })
        }
        .await;
        self.screen.commit(ticket, result).map(drop)
    }

    /// Deletes a tag.
    pub async fn delete_tag(&mut self, tag: &str) -> Result<()> {
        let result = self.client.delete_tag(tag).await;
        self.screen.track(result)?;
        self.load().await
    }

    /// Deletes a subscription listed under a tag.
    pub async fn delete_subscription(&mut self, id: &str) -> Result<()> {
        let result = self.client.delete_subscription(id).await;
        self.screen.track(result)?;
        self.load().await
    }
}
