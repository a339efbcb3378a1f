//! Contact management command implementation.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::{ContactList, ContactPatch, ContactType};

use crate::cli::ContactCommands;
use crate::containers::SettingsContainer;
use crate::error::Result;
use crate::output::{ActionResult, OutputFormat};

/// Handler for contact subcommands.
pub struct ContactsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> ContactsCommand<'a> {
    /// Creates a new contact command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the contact subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if validation or the request fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &ContactCommands) -> Result<()> {
        let mut settings = SettingsContainer::new(self.client.clone());
        settings.load().await?;

        match command {
            ContactCommands::List => {
                let list = ContactList {
                    list: settings.screen().require()?.settings.contacts.clone(),
                };
                format.write(out, &list)
            }
            ContactCommands::Add { kind, value, fallback } => {
                self.add(out, format, &mut settings, kind.clone(), value, fallback.as_deref())
                    .await
            }
            ContactCommands::Update {
                id,
                value,
                fallback,
                clear_fallback,
            } => {
                let patch = ContactPatch {
                    kind: None,
                    value: value.clone(),
                    fallback_value: if *clear_fallback {
                        Some(None)
                    } else {
                        fallback.clone().map(Some)
                    },
                };
                let contact = settings.update_contact(id, &patch).await?;
                format.write(out, &contact)
            }
            ContactCommands::Remove { id } => {
                settings.remove_contact(id).await?;
                format.write(out, &ActionResult::ok(format!("Contact {id} deleted")))
            }
            ContactCommands::Test { id } => {
                settings.test_contact(id).await?;
                format.write(out, &ActionResult::ok(format!("Test notification sent to contact {id}")))
            }
        }
    }

    async fn add<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        settings: &mut SettingsContainer,
        kind: ContactType,
        value: &str,
        fallback: Option<&str>,
    ) -> Result<()> {
        let contact = settings.add_contact(kind, value, fallback).await?;
        tracing::info!(id = %contact.id, kind = %contact.kind, "contact added");
        format.write(out, &contact)
    }
}
