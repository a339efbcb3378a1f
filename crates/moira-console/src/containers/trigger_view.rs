//! Trigger detail screen: definition, current state and event history.

use std::collections::BTreeMap;

use moira_api::MoiraClient;
use moira_core::{export_file_name, export_trigger, EventList, ExportFormat, Maintenance, Trigger, TriggerState};
use serde::Serialize;

use crate::error::Result;
use crate::screen::Screen;

/// Loaded trigger detail.
#[derive(Debug, Clone)]
pub struct TriggerView {
    /// Trigger definition.
    pub trigger: Trigger,
    /// Current evaluation state.
    pub state: TriggerState,
    /// One page of events.
    pub events: EventList,
}

/// A rendered trigger export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerExport {
    /// Suggested file name.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

/// Controller of the trigger detail screen.
#[derive(Debug)]
pub struct TriggerViewContainer {
    client: MoiraClient,
    id: String,
    page: u64,
    screen: Screen<TriggerView>,
}

impl TriggerViewContainer {
    /// Creates the controller for trigger `id`.
    pub fn new(client: MoiraClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            page: 1,
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<TriggerView> {
        &self.screen
    }

    /// Loads the trigger with the given one-based event page.
    pub async fn load(&mut self, page: u64) -> Result<()> {
        self.page = page.max(1);
        let ticket = self.screen.begin();
        let result = self.fetch().await;
        self.screen.commit(ticket, result).map(drop)
    }

    async fn fetch(&self) -> Result<TriggerView> {
        let trigger = self.client.get_trigger(&self.id).await?;
        let state = self.client.get_trigger_state(&self.id).await?;
        let events = self.client.get_trigger_events(&self.id, self.page - 1).await?;
        Ok(TriggerView { trigger, state, events })
    }

    async fn after_action<E: Into<crate::error::ConsoleError>>(&mut self, result: std::result::Result<(), E>) -> Result<()> {
        self.screen.track(result)?;
        self.load(self.page).await
    }

    /// Puts the whole trigger into maintenance.
    pub async fn set_trigger_maintenance(&mut self, maintenance: Maintenance, now: i64) -> Result<()> {
        let result = self
            .client
            .set_trigger_maintenance(&self.id, maintenance.until(now))
            .await;
        self.after_action(result).await
    }

    /// Puts one metric into maintenance.
    pub async fn set_metric_maintenance(&mut self, metric: &str, maintenance: Maintenance, now: i64) -> Result<()> {
        let metrics = BTreeMap::from([(metric.to_string(), maintenance.until(now))]);
        let result = self.client.set_maintenance(&self.id, &metrics).await;
        self.after_action(result).await
    }

    /// Drops pending throttled notifications.
    pub async fn clear_throttling(&mut self) -> Result<()> {
        let result = self.client.delete_throttling(&self.id).await;
        self.after_action(result).await
    }

    /// Acknowledges running escalations.
    pub async fn ack_escalations(&mut self) -> Result<()> {
        let result = self.client.ack_escalations(&self.id).await;
        self.after_action(result).await
    }

    /// Removes a metric from the trigger.
    pub async fn remove_metric(&mut self, metric: &str) -> Result<()> {
        let result = self.client.delete_metric(&self.id, metric).await;
        self.after_action(result).await
    }

    /// Renders the loaded trigger for download.
    pub fn export(&self, format: ExportFormat) -> Result<TriggerExport> {
        let view = self.screen.require()?;
        Ok(TriggerExport {
            file_name: export_file_name(&view.trigger, format),
            contents: export_trigger(&view.trigger, format)?,
        })
    }
}
