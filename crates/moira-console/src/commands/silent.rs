//! Silent pattern command implementation.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::{SilentPattern, SilentSort};

use crate::cli::{SilentCommands, SilentKind};
use crate::containers::SilentPatternsContainer;
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat, SilentTable};

/// Handler for silent subcommands.
pub struct SilentCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> SilentCommand<'a> {
    /// Creates a new silent command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the silent subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &SilentCommands) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        match command {
            SilentCommands::List {
                kind,
                search,
                sort,
                order,
            } => {
                let mut container = self.container(*kind);
                container.load().await?;
                container.set_search(search.as_str());
                container.set_sort(SilentSort::new((*sort).into(), (*order).into()));
                let table = SilentTable {
                    patterns: container.visible()?.into_iter().cloned().collect(),
                    now,
                };
                format.write(out, &table)
            }
            SilentCommands::Add {
                patterns,
                kind,
                duration,
            } => {
                let until = duration.until(now);
                let mut container = self.container(*kind);
                let new = patterns
                    .iter()
                    .map(|p| SilentPattern::new((*kind).into(), p.as_str(), until))
                    .collect();
                container.create(new).await?;
                format.write(
                    out,
                    &ActionResult::ok(format!("{} pattern(s) silenced for {}", patterns.len(), duration.caption())),
                )
            }
            SilentCommands::Prolong { ids, kind, duration } => {
                let mut container = self.container(*kind);
                container.load().await?;
                container.prolong(ids, *duration, now).await?;
                format.write(
                    out,
                    &ActionResult::ok(format!("{} pattern(s) prolonged for {}", ids.len(), duration.caption())),
                )
            }
            SilentCommands::Delete { ids, kind } => {
                let mut container = self.container(*kind);
                container.load().await?;
                container.delete(ids).await?;
                format.write(out, &ActionResult::ok(format!("{} pattern(s) deleted", ids.len())))
            }
        }
    }

    fn container(&self, kind: SilentKind) -> SilentPatternsContainer {
        SilentPatternsContainer::new(self.client.clone(), kind.into())
    }
}
