//! Metric pattern command implementation.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::PatternList;

use crate::cli::PatternCommands;
use crate::containers::PatternsContainer;
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat};

/// Handler for pattern subcommands.
pub struct PatternsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> PatternsCommand<'a> {
    /// Creates a new pattern command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the pattern subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &PatternCommands) -> Result<()> {
        let mut container = PatternsContainer::new(self.client.clone());
        match command {
            PatternCommands::List => {
                container.load().await?;
                let list = PatternList {
                    list: container.screen().require()?.clone(),
                };
                format.write(out, &list)
            }
            PatternCommands::Delete { pattern } => {
                container.delete(pattern).await?;
                format.write(out, &ActionResult::ok(format!("Pattern '{pattern}' deleted")))
            }
        }
    }
}
