//! Tag command implementation.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::TagStatList;

use crate::cli::TagCommands;
use crate::containers::TagsContainer;
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat};

/// Handler for tag subcommands.
pub struct TagsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> TagsCommand<'a> {
    /// Creates a new tag command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the tag subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &TagCommands) -> Result<()> {
        let mut container = TagsContainer::new(self.client.clone());
        match command {
            TagCommands::List => {
                container.load().await?;
                let stats = TagStatList {
                    list: container.screen().require()?.tags.clone(),
                };
                format.write(out, &stats)
            }
            TagCommands::Delete { tag } => {
                container.delete_tag(tag).await?;
                format.write(out, &ActionResult::ok(format!("Tag '{tag}' deleted")))
            }
        }
    }
}
