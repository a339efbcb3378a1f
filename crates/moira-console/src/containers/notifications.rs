//! Pending notification queue.

use moira_api::MoiraClient;
use moira_core::NotificationList;

use crate::error::Result;
use crate::screen::Screen;

/// Controller of the notification queue screen.
#[derive(Debug)]
pub struct NotificationsContainer {
    client: MoiraClient,
    screen: Screen<NotificationList>,
}

impl NotificationsContainer {
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
    pub const fn screen(&self) -> &Screen<NotificationList> {
        &self.screen
    }

    /// Fetches the whole queue.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.screen.begin();
        let result = self.client.get_notification_list().await.map_err(Into::into);
        self.screen.commit(ticket, result).map(drop)
    }

    /// Removes one notification by its composite ID.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let result = self.client.delete_notification(id).await;
        self.screen.track(result)?;
        self.load().await
    }
}
