//! Subscription management command implementation.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::{SubscriptionCreateInfo, SubscriptionPatch, DEGRADATION_TAG, ERROR_TAG};

use crate::cli::{SubscriptionArgs, SubscriptionCommands};
use crate::containers::{SettingsContainer, SubscriptionSearchContainer};
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat, SearchOutput, SubscriptionTable};

/// Handler for subscription subcommands.
pub struct SubscriptionsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> SubscriptionsCommand<'a> {
    /// Creates a new subscription command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the subscription subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if validation or the request fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &SubscriptionCommands,
    ) -> Result<()> {
        match command {
            SubscriptionCommands::List => {
                let settings = self.settings().await?;
                let view = settings.screen().require()?;
                let table = SubscriptionTable {
                    subscriptions: view.settings.subscriptions.clone(),
                    contacts: view.settings.contacts.clone(),
                };
                format.write(out, &table)
            }
            SubscriptionCommands::Add(args) => {
                self.settings().await?.add_subscription(create_info(args)).await?;
                format.write(out, &ActionResult::ok("Subscription added"))
            }
            SubscriptionCommands::Enable { id } => self.set_enabled(out, format, id, true).await,
            SubscriptionCommands::Disable { id } => self.set_enabled(out, format, id, false).await,
            SubscriptionCommands::Remove { id } => {
                self.settings().await?.remove_subscription(id).await?;
                format.write(out, &ActionResult::ok(format!("Subscription {id} deleted")))
            }
            SubscriptionCommands::Test { id } => {
                self.settings().await?.test_subscription(id).await?;
                format.write(out, &ActionResult::ok(format!("Test notification sent for subscription {id}")))
            }
            SubscriptionCommands::Search { value } => {
                let mut search = SubscriptionSearchContainer::new(self.client.clone());
                let view = search.search(value).await?;
                format.write(out, &SearchOutput::from(view))
            }
        }
    }

    async fn settings(&self) -> Result<SettingsContainer> {
        let mut settings = SettingsContainer::new(self.client.clone());
        settings.load().await?;
        Ok(settings)
    }

    async fn set_enabled<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: &str,
        enabled: bool,
    ) -> Result<()> {
        let patch = SubscriptionPatch {
            enabled: Some(enabled),
            ..SubscriptionPatch::default()
        };
        self.settings().await?.update_subscription(id, &patch).await?;
        let state = if enabled { "enabled" } else { "disabled" };
        format.write(out, &ActionResult::ok(format!("Subscription {id} {state}")))
    }
}

fn create_info(args: &SubscriptionArgs) -> SubscriptionCreateInfo {
    let mut info = SubscriptionCreateInfo::new(String::new());
    info.tags.clone_from(&args.tags);
    info.contacts.clone_from(&args.contacts);
    info.throttling = !args.no_throttling;
    if args.degraded_only {
        info.tags.push(DEGRADATION_TAG.to_string());
    }
    if args.no_warn {
        info.tags.push(ERROR_TAG.to_string());
    }
    info
}
