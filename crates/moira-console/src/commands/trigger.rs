//! Single-trigger command implementation.
//!
//! Handles showing, creating, updating, deleting and exporting a trigger,
//! plus the maintenance and cleanup actions of the trigger screen.

use std::io::Write;
use std::path::Path;

use moira_api::MoiraClient;
use moira_core::{ExportFormat, Maintenance, Trigger, TriggerPatch};
use serde::de::DeserializeOwned;

use crate::cli::TriggerCommands;
use crate::containers::{TriggerEditContainer, TriggerViewContainer};
use crate::error::{ConsoleError, Result};
use crate::output::{ActionResult, OutputFormat, TriggerDetail};

/// Handler for trigger subcommands.
pub struct TriggerCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> TriggerCommand<'a> {
    /// Creates a new trigger command handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Executes the trigger subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, command: &TriggerCommands) -> Result<()> {
        match command {
            TriggerCommands::Show { id, page } => self.show(out, format, id, *page).await,
            TriggerCommands::Create { file } => self.create(out, format, file).await,
            TriggerCommands::Update { id, file } => self.update(out, format, id, file).await,
            TriggerCommands::Delete { id } => self.delete(out, format, id).await,
            TriggerCommands::Export { id, to, output } => {
                self.export(out, format, id, (*to).into(), output.as_deref()).await
            }
            TriggerCommands::Maintenance { id, duration, metric } => {
                self.maintenance(out, format, id, *duration, metric.as_deref()).await
            }
            TriggerCommands::ClearThrottling { id } => {
                let mut view = TriggerViewContainer::new(self.client.clone(), id.as_str());
                view.clear_throttling().await?;
                format.write(out, &ActionResult::ok(format!("Throttling of trigger {id} cleared")))
            }
            TriggerCommands::AckEscalations { id } => {
                let mut view = TriggerViewContainer::new(self.client.clone(), id.as_str());
                view.ack_escalations().await?;
                format.write(out, &ActionResult::ok(format!("Escalations of trigger {id} acknowledged")))
            }
            TriggerCommands::RemoveMetric { id, metric } => {
                let mut view = TriggerViewContainer::new(self.client.clone(), id.as_str());
                view.remove_metric(metric).await?;
                format.write(out, &ActionResult::ok(format!("Metric '{metric}' removed from trigger {id}")))
            }
        }
    }

    async fn show<W: Write>(&self, out: &mut W, format: &OutputFormat, id: &str, page: u64) -> Result<()> {
        let mut view = TriggerViewContainer::new(self.client.clone(), id);
        view.load(page).await?;
        let detail = TriggerDetail::from(view.screen().require()?);
        format.write(out, &detail)
    }

    async fn create<W: Write>(&self, out: &mut W, format: &OutputFormat, file: &Path) -> Result<()> {
        let draft: Trigger = read_document(file)?;
        let mut edit = TriggerEditContainer::new(self.client.clone());
        edit.load_new(draft).await?;
        let saved = edit.create().await?;
        format.write(out, &ActionResult::ok(format!("Trigger created with ID {}", saved.id)))
    }

    async fn update<W: Write>(&self, out: &mut W, format: &OutputFormat, id: &str, file: &Path) -> Result<()> {
        let patch: TriggerPatch = read_document(file)?;
        if patch.is_empty() {
            return Err(ConsoleError::InvalidArgument(format!(
                "{} changes nothing",
                file.display()
            )));
        }
        let mut edit = TriggerEditContainer::new(self.client.clone());
        edit.load(id).await?;
        edit.apply(&patch)?;
        edit.save().await?;
        format.write(out, &ActionResult::ok(format!("Trigger {id} updated")))
    }

    async fn delete<W: Write>(&self, out: &mut W, format: &OutputFormat, id: &str) -> Result<()> {
        let mut edit = TriggerEditContainer::new(self.client.clone());
        edit.load(id).await?;
        edit.delete().await?;
        format.write(out, &ActionResult::ok(format!("Trigger {id} deleted")))
    }

    async fn export<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: &str,
        to: ExportFormat,
        output: Option<&Path>,
    ) -> Result<()> {
        let mut view = TriggerViewContainer::new(self.client.clone(), id);
        view.load(1).await?;
        let export = view.export(to)?;
        match output {
            Some(dir) => {
                let path = dir.join(&export.file_name);
                std::fs::write(&path, &export.contents)?;
                format.write(out, &ActionResult::ok(format!("Trigger exported to {}", path.display())))
            }
            None => format.write(out, &export),
        }
    }

    async fn maintenance<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: &str,
        duration: Maintenance,
        metric: Option<&str>,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut view = TriggerViewContainer::new(self.client.clone(), id);
        let target = match metric {
            Some(metric) => {
                view.set_metric_maintenance(metric, duration, now).await?;
                format!("metric '{metric}'")
            }
            None => {
                view.set_trigger_maintenance(duration, now).await?;
                format!("trigger {id}")
            }
        };
        let message = match duration {
            Maintenance::Off => format!("Maintenance of {target} turned off"),
            other => format!("Maintenance of {target} set for {}", other.caption()),
        };
        format.write(out, &ActionResult::ok(message))
    }
}

/// Reads a YAML or JSON document.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConsoleError::InvalidArgument(format!("failed to read '{}': {e}", path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| ConsoleError::InvalidArgument(format!("failed to parse '{}': {e}", path.display())))
}
