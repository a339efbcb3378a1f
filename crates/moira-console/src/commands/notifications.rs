//! Notification queue command implementation.

use std::io::Write;

use moira_api::MoiraClient;

use crate::cli::NotificationCommands;
use crate::containers::NotificationsContainer;
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat};

/// Handler for notification subcommands.
pub struct NotificationsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> NotificationsCommand<'a> {
    /// Creates a new notification command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the notification subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &NotificationCommands,
    ) -> Result<()> {
        let mut container = NotificationsContainer::new(self.client.clone());
        match command {
            NotificationCommands::List => {
                container.load().await?;
                format.write(out, container.screen().require()?)
            }
            NotificationCommands::Delete { id } => {
                container.delete(id).await?;
                format.write(out, &ActionResult::ok(format!("Notification {id} deleted")))
            }
        }
    }
}
