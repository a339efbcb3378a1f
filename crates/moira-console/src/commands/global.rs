//! Global settings command implementation.

use std::io::Write;

use moira_api::MoiraClient;

use crate::cli::GlobalCommands;
use crate::containers::SettingsContainer;
use crate::error::{ConsoleError, Result};
use crate::output::OutputFormat;

/// Handler for global settings subcommands.
pub struct GlobalCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> GlobalCommand<'a> {
    /// Creates a new global settings handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the global settings subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the user is not a superuser or the request fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &GlobalCommands) -> Result<()> {
        let mut settings = SettingsContainer::new(self.client.clone());
        settings.load().await?;
        let global = match command {
            GlobalCommands::Show => settings
                .screen()
                .require()?
                .global
                .ok_or_else(|| ConsoleError::invalid_state("global settings are not loaded"))?,
            GlobalCommands::Toggle => settings.toggle_notifications().await?,
        };
        format.write(out, &global)
    }
}
