//! Trigger list command implementation.

use std::io::Write;

use moira_api::MoiraClient;

use crate::cli::TriggerListArgs;
use crate::containers::{TriggerListContainer, TriggerListLoad};
use crate::error::{ConsoleError, Result};
use crate::filters::{FilterDefaults, FilterStore};
use crate::location::TriggerListSearch;
use crate::output::{OutputFormat, TriggerPage};

/// A page-clamp redirect may follow a defaults redirect; anything beyond
/// that means the server keeps moving the page.
const MAX_REDIRECTS: usize = 3;

/// Handler for `moira triggers`.
pub struct TriggersCommand<'a> {
    client: &'a MoiraClient,
    store: Option<&'a FilterStore>,
}

impl<'a> TriggersCommand<'a> {
    /// Creates a new trigger list handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient, store: Option<&'a FilterStore>) -> Self {
        Self { client, store }
    }

    /// Lists one page of triggers.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, args: &TriggerListArgs) -> Result<()> {
        let mut container = TriggerListContainer::new(self.client.clone(), self.store.cloned());
        let mut search = TriggerListSearch {
            page: args.page.max(1),
            tags: args.tags.clone(),
            only_problems: args.only_problems,
            trigger_name: args.name.clone().unwrap_or_default(),
        };

        let defaults = match self.store {
            Some(store) if !args.no_defaults => store.load(),
            _ => FilterDefaults::default(),
        };
        if !search.tags.is_empty() || search.only_problems {
            search = container.change_search(|s| *s = search.clone());
        }

        for _ in 0..=MAX_REDIRECTS {
            match container.load(search, &defaults).await? {
                TriggerListLoad::Loaded => {
                    let view = container.screen().require()?;
                    format.write(out, &TriggerPage::from(view))?;
                    return Ok(());
                }
                TriggerListLoad::Redirect(next) => {
                    tracing::debug!(location = %next.encode(), "trigger list redirect");
                    search = next;
                }
            }
        }
        Err(ConsoleError::invalid_state("trigger list kept redirecting"))
    }
}
