//! Console configuration.
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! api_url = "https://moira.example.ru/api"
//! login = "ops"
//! request_timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use moira_api::{MoiraClient, MoiraClientBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::filters::FilterStore;

/// API root used when neither the file nor the command line sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:8081/api";

/// Settings of the `moira` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Root URL of the Moira API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Login sent in the `X-WebAuth-User` header.
    #[serde(default)]
    pub login: Option<String>,
    /// Per-request timeout; unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Where trigger-list filters are stored.
    #[serde(default)]
    pub filters_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            login: None,
            request_timeout_secs: None,
            filters_path: None,
        }
    }
}

impl ConsoleConfig {
    /// Default configuration file: `<config dir>/moira/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("moira").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConsoleError::Config(format!(
                "failed to read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConsoleError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, else the default file when it exists, else
    /// the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConsoleError::Config("api_url cannot be empty".to_string()));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConsoleError::Config(
                "api_url must start with http:// or https://".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConsoleError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Override the API root.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the login.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Set the filter store location.
    #[must_use]
    pub fn with_filters_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.filters_path = Some(path.into());
        self
    }

    /// Store for trigger-list filters: `filters_path` when set, else the
    /// per-user default.
    #[must_use]
    pub fn filter_store(&self) -> Option<FilterStore> {
        self.filters_path
            .as_ref()
            .map(FilterStore::new)
            .or_else(FilterStore::default_location)
    }

    /// Builds a gateway client from these settings.
    pub fn client(&self) -> Result<MoiraClient> {
        let mut builder = MoiraClientBuilder::new(&self.api_url);
        if let Some(login) = &self.login {
            builder = builder.with_login(login);
        }
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.with_timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}
