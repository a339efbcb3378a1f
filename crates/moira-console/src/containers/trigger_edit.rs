//! Trigger editing and creation.

use moira_api::MoiraClient;
use moira_core::{SaveTriggerResponse, Trigger, TriggerPatch};
use moira_validation::validate_trigger;

use crate::error::Result;
use crate::screen::Screen;

/// Form state of the edit screen.
#[derive(Debug, Clone)]
pub struct TriggerForm {
    /// Trigger being edited, with pending changes applied.
    pub trigger: Trigger,
    /// Known tags, offered for completion.
    pub tags: Vec<String>,
    /// Allowed dashboard URL prefixes.
    pub grafana_prefixes: Vec<String>,
}

/// Controller of the edit and create screens.
#[derive(Debug)]
pub struct TriggerEditContainer {
    client: MoiraClient,
    screen: Screen<TriggerForm>,
}

impl TriggerEditContainer {
    /// Creates the controller.
    #[must_use]
    pub fn new(client: MoiraClient) -> Self {
        Self {
            client,
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<TriggerForm> {
        &self.screen
    }

    /// Loads an existing trigger for editing.
    pub async fn load(&mut self, id: &str) -> Result<()> {
        let ticket = self.screen.begin();
        let result = async {
            let trigger = self.client.get_trigger(id).await?;
            self.form(trigger).await
        }
        .await;
        self.screen.commit(ticket, result).map(drop)
    }

    /// Starts a new trigger from `draft`.
    pub async fn load_new(&mut self, draft: Trigger) -> Result<()> {
        let ticket = self.screen.begin();
        let result = self.form(draft).await;
        self.screen.commit(ticket, result).map(drop)
    }

    async fn form(&self, trigger: Trigger) -> Result<TriggerForm> {
        let tags = self.client.get_tag_list().await?;
        let config = self.client.get_config().await?;
        Ok(TriggerForm {
            trigger,
            tags: tags.list,
            grafana_prefixes: config.grafana_prefixes,
        })
    }

    /// Applies pending changes to the form.
    pub fn apply(&mut self, patch: &TriggerPatch) -> Result<&Trigger> {
        let form = self.screen.require_mut()?;
        form.trigger = form.trigger.merged(patch);
        Ok(&form.trigger)
    }

    fn validated(&self) -> Result<&Trigger> {
        let form = self.screen.require()?;
        validate_trigger(&form.trigger, &form.grafana_prefixes)?;
        Ok(&form.trigger)
    }

    /// Validates and saves an existing trigger.
    pub async fn save(&mut self) -> Result<SaveTriggerResponse> {
        let trigger = self.validated()?.clone();
        let result = self.client.set_trigger(&trigger.id, &trigger).await;
        self.screen.track(result)
    }

    /// Validates and creates the trigger held by the form.
    pub async fn create(&mut self) -> Result<SaveTriggerResponse> {
        let trigger = self.validated()?.clone();
        let result = self.client.add_trigger(&trigger).await;
        let saved = self.screen.track(result)?;
        tracing::info!(id = %saved.id, name = %trigger.name, "trigger created");
        Ok(saved)
    }

    /// Deletes the trigger.
    pub async fn delete(&mut self) -> Result<()> {
        let id = self.screen.require()?.trigger.id.clone();
        let result = self.client.delete_trigger(&id).await;
        self.screen.track(result)
    }
}
