//! User settings screen: contacts, subscriptions and the global kill switch.

use moira_api::MoiraClient;
use moira_core::{
    normalize_value_for_api, normalize_value_for_ui, Contact, ContactConfig, ContactCreateInfo, ContactPatch,
    ContactType, GlobalSettings, Settings, SubscriptionCreateInfo, SubscriptionPatch, UiConfig,
};
use moira_validation::{validate_contact, validate_subscription};

use crate::error::{ConsoleError, Result};
use crate::screen::Screen;

/// Loaded settings screen.
#[derive(Debug, Clone)]
pub struct SettingsView {
    /// UI configuration with the available contact types.
    pub config: UiConfig,
    /// Known tags.
    pub tags: Vec<String>,
    /// The user's contacts and subscriptions.
    pub settings: Settings,
    /// Global settings; only loaded for superusers.
    pub global: Option<GlobalSettings>,
}

impl SettingsView {
    fn contact_config(&self, kind: &ContactType) -> Result<&ContactConfig> {
        self.config
            .contact_config(kind)
            .ok_or_else(|| ConsoleError::NotFound(format!("contact type {kind}")))
    }
}

/// Controller of the settings screen.
#[derive(Debug)]
pub struct SettingsContainer {
    client: MoiraClient,
    screen: Screen<SettingsView>,
}

impl SettingsContainer {
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
    pub const fn screen(&self) -> &Screen<SettingsView> {
        &self.screen
    }

    /// Fetches configuration, tags and settings.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.screen.begin();
        let result = fetch(&self.client).await;
        self.screen.commit(ticket, result).map(drop)
    }

    async fn after<R, E: Into<ConsoleError>>(&mut self, result: std::result::Result<R, E>) -> Result<R> {
        let value = self.screen.track(result)?;
        self.load().await?;
        Ok(value)
    }

    /// Validates, normalizes and creates a contact owned by the current user.
    pub async fn add_contact(&mut self, kind: ContactType, value: &str, fallback_value: Option<&str>) -> Result<Contact> {
        let view = self.screen.require()?;
        let config = view.contact_config(&kind)?;
        validate_contact(config, value, fallback_value)?;
        let info = ContactCreateInfo {
            fallback_value: fallback_for(config, fallback_value),
            value: normalize_value_for_api(&kind, value),
            kind,
            user: view.settings.login.clone(),
        };
        let result = self.client.add_contact(&info).await;
        let mut contact = self.after(result).await?;
        contact.value = normalize_value_for_ui(&contact.kind, &contact.value);
        Ok(contact)
    }

    /// Applies `patch` to a contact, validates and saves it.
    pub async fn update_contact(&mut self, id: &str, patch: &ContactPatch) -> Result<Contact> {
        let view = self.screen.require()?;
        let current = view
            .settings
            .contact(id)
            .ok_or_else(|| ConsoleError::NotFound(format!("contact {id}")))?;
        let mut contact = current.merged(patch);
        let config = view.contact_config(&contact.kind)?;
        validate_contact(config, &contact.value, contact.fallback_value.as_deref())?;
        contact.fallback_value = fallback_for(config, contact.fallback_value.as_deref());
        contact.value = normalize_value_for_api(&contact.kind, &contact.value);

        let result = self.client.update_contact(&contact).await;
        self.after(result).await
    }

    /// Deletes a contact.
    pub async fn remove_contact(&mut self, id: &str) -> Result<()> {
        self.screen.require()?;
        let result = self.client.delete_contact(id).await;
        self.after(result).await
    }

    /// Sends a test notification to a contact.
    pub async fn test_contact(&mut self, id: &str) -> Result<()> {
        self.screen.require()?;
        let result = self.client.test_contact(id).await;
        self.screen.track(result)
    }

    /// Validates and creates a subscription owned by the current user.
    pub async fn add_subscription(&mut self, mut info: SubscriptionCreateInfo) -> Result<()> {
        let view = self.screen.require()?;
        info.user.clone_from(&view.settings.login);
        validate_subscription(&info)?;
        let result = self.client.add_subscription(&info).await;
        self.after(result).await.map(drop)
    }

    /// Applies `patch` to a subscription, validates and saves it.
    pub async fn update_subscription(&mut self, id: &str, patch: &SubscriptionPatch) -> Result<()> {
        let view = self.screen.require()?;
        let subscription = view
            .settings
            .subscriptions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("subscription {id}")))?
            .merged(patch);
        validate_subscription(&subscription)?;
        let result = self.client.update_subscription(&subscription).await;
        self.after(result).await.map(drop)
    }

    /// Deletes a subscription.
    pub async fn remove_subscription(&mut self, id: &str) -> Result<()> {
        self.screen.require()?;
        let result = self.client.delete_subscription(id).await;
        self.after(result).await
    }

    /// Sends a test notification through a subscription.
    pub async fn test_subscription(&mut self, id: &str) -> Result<()> {
        self.screen.require()?;
        let result = self.client.test_subscription(id).await;
        self.screen.track(result)
    }

    /// Flips the global notification kill switch. Superusers only.
    pub async fn toggle_notifications(&mut self) -> Result<GlobalSettings> {
        let global = self
            .screen
            .require()?
            .global
            .ok_or_else(|| ConsoleError::invalid_state("global settings are not loaded"))?;
        let next = global.toggled();
        let result = self.client.set_global_settings(&next).await;
        self.after(result).await?;
        tracing::info!(disabled = next.notifications.disabled, "notifications switched");
        Ok(next)
    }
}

fn fallback_for(config: &ContactConfig, fallback_value: Option<&str>) -> Option<String> {
    if !config.allows_fallback() {
        return None;
    }
    fallback_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

async fn fetch(client: &MoiraClient) -> Result<SettingsView> {
    let config = client.get_config().await?;
    let tags = client.get_tag_list().await?;
    let settings = client.get_settings().await?;
    let global = if settings.is_super_user {
        Some(client.get_global_settings().await?)
    } else {
        None
    };
    Ok(SettingsView {
        config,
        tags: tags.list,
        settings,
        global,
    })
}
