//! HTTP client for the Moira API.
//!
//! Every method issues exactly one request. There is no retry, no cache and
//! no batching; a non-2xx status always fails with [`ApiError::Remote`].

use std::collections::BTreeMap;
use std::time::Duration;

use moira_core::{
    Contact, ContactCreateInfo, ContactList, EventList, GlobalSettings, MetricStats,
    NotificationList, PatternList, SaveTriggerResponse, Settings, SilentPatternList,
    SilentPatternType, Subscription, SubscriptionCreateInfo, SubscriptionSearchResult, TagList,
    TagStatList, Trigger, TriggerList, TriggerState, UiConfig,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, Result};
use crate::query::Query;

/// Number of triggers per page of `GET /trigger/page`.
pub const TRIGGER_LIST_PAGE_SIZE: u64 = 20;

/// Number of events per page of `GET /event/{id}`.
pub const EVENT_HISTORY_PAGE_SIZE: u64 = 100;

/// Header carrying the login when the API sits behind an auth proxy.
pub const LOGIN_HEADER: &str = "X-WebAuth-User";

/// Query of the notification feed that selects every entry.
const ALL_NOTIFICATIONS: &str = "start=0&end=-1";

/// Extracts the user-facing message from an error response body.
///
/// A JSON object with a string `error` field yields that string; anything
/// else yields the body unchanged.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Turns a non-2xx response into [`ApiError::Remote`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let path = response.url().path().to_string();
    let body = response.text().await?;
    let message = error_message(&body);
    warn!(status = %status, path = %path, message = %message, "request failed");
    Err(ApiError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Builder for [`MoiraClient`].
#[derive(Debug, Clone)]
pub struct MoiraClientBuilder {
    base_url: String,
    login: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl MoiraClientBuilder {
    /// Starts a builder for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login: None,
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Sends `login` in the [`LOGIN_HEADER`] header.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a per-request timeout. Requests have no timeout by default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<MoiraClient> {
        let base_url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url));
        }

        let mut headers = HeaderMap::new();
        let login = self.login.map(|login| (LOGIN_HEADER.to_string(), login));
        for (name, value) in self.headers.into_iter().chain(login) {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| ApiError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(MoiraClient {
            base_url,
            http: http.build()?,
        })
    }
}

/// Async gateway to the Moira API.
#[derive(Debug, Clone)]
pub struct MoiraClient {
    base_url: Url,
    http: reqwest::Client,
}

impl MoiraClient {
    /// Creates a client with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        MoiraClientBuilder::new(base_url).build()
    }

    /// Starts a [`MoiraClientBuilder`].
    pub fn builder(base_url: impl Into<String>) -> MoiraClientBuilder {
        MoiraClientBuilder::new(base_url)
    }

    /// Root of the API.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded,
    /// so a tag or pattern containing `/` stays one segment.
    fn url(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Response> {
        debug!(method = %method, path = %url.path(), query = url.query().unwrap_or_default(), "sending request");
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        check_status(request.send().await?).await
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        decode(response).await
    }

    async fn call<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, url, Some(body)).await?;
        decode(response).await
    }

    async fn call_void<B: Serialize + ?Sized>(&self, method: Method, url: Url, body: Option<&B>) -> Result<()> {
        self.send(method, url, body).await.map(drop)
    }

    // Configuration and settings

    /// `GET /config`
    pub async fn get_config(&self) -> Result<UiConfig> {
        self.get(self.url(&["config"], None)?).await
    }

    /// `GET /global-settings`
    pub async fn get_global_settings(&self) -> Result<GlobalSettings> {
        self.get(self.url(&["global-settings"], None)?).await
    }

    /// `PUT /global-settings`
    pub async fn set_global_settings(&self, settings: &GlobalSettings) -> Result<()> {
        let url = self.url(&["global-settings"], None)?;
        self.call_void(Method::PUT, url, Some(settings)).await
    }

    /// `GET /user/settings`
    ///
    /// Subscriptions stored before the notification flags existed get them
    /// derived from their `DEGRADATION` and `ERROR` tags.
    pub async fn get_settings(&self) -> Result<Settings> {
        let mut settings: Settings = self.get(self.url(&["user", "settings"], None)?).await?;
        settings.normalize_legacy_flags();
        Ok(settings)
    }

    // Contacts

    /// `GET /contact`
    pub async fn get_contact_list(&self) -> Result<ContactList> {
        self.get(self.url(&["contact"], None)?).await
    }

    /// `PUT /contact`
    pub async fn add_contact(&self, contact: &ContactCreateInfo) -> Result<Contact> {
        self.call(Method::PUT, self.url(&["contact"], None)?, contact).await
    }

    /// `PUT /contact/{id}`
    pub async fn update_contact(&self, contact: &Contact) -> Result<Contact> {
        self.call(Method::PUT, self.url(&["contact", contact.id.as_str()], None)?, contact)
            .await
    }

    /// `POST /contact/{id}/test`
    pub async fn test_contact(&self, contact_id: &str) -> Result<()> {
        let url = self.url(&["contact", contact_id, "test"], None)?;
        self.call_void::<()>(Method::POST, url, None).await
    }

    /// `DELETE /contact/{id}`
    pub async fn delete_contact(&self, contact_id: &str) -> Result<()> {
        let url = self.url(&["contact", contact_id], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    // Subscriptions

    /// `GET /subscription/search?contact=`
    pub async fn search_subscriptions(&self, contact_value: &str) -> Result<SubscriptionSearchResult> {
        let query = Query::new().param("contact", contact_value);
        self.get(self.url(&["subscription", "search"], Some(&query.encode()))?)
            .await
    }

    /// `PUT /subscription`
    pub async fn add_subscription(&self, subscription: &SubscriptionCreateInfo) -> Result<Subscription> {
        self.call(Method::PUT, self.url(&["subscription"], None)?, subscription)
            .await
    }

    /// `PUT /subscription/{id}`
    pub async fn update_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        let url = self.url(&["subscription", subscription.id.as_str()], None)?;
        self.call(Method::PUT, url, subscription).await
    }

    /// `DELETE /subscription/{id}`
    pub async fn delete_subscription(&self, subscription_id: &str) -> Result<()> {
        let url = self.url(&["subscription", subscription_id], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `PUT /subscription/{id}/test`
    pub async fn test_subscription(&self, subscription_id: &str) -> Result<()> {
        let url = self.url(&["subscription", subscription_id, "test"], None)?;
        self.call_void::<()>(Method::PUT, url, None).await
    }

    // Patterns and silent patterns

    /// `GET /pattern`
    pub async fn get_pattern_list(&self) -> Result<PatternList> {
        self.get(self.url(&["pattern"], None)?).await
    }

    /// `DELETE /pattern/{pattern}`
    pub async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let url = self.url(&["pattern", pattern], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `GET /silent-pattern?type=`
    pub async fn get_silent_pattern_list(&self, kind: SilentPatternType) -> Result<SilentPatternList> {
        let query = Query::new().param("type", kind.code());
        self.get(self.url(&["silent-pattern"], Some(&query.encode()))?).await
    }

    /// `PUT /silent-pattern`
    pub async fn add_silent_patterns(&self, patterns: &SilentPatternList) -> Result<()> {
        let url = self.url(&["silent-pattern"], None)?;
        self.call_void(Method::PUT, url, Some(patterns)).await
    }

    /// `POST /silent-pattern`
    pub async fn update_silent_patterns(&self, patterns: &SilentPatternList) -> Result<()> {
        let url = self.url(&["silent-pattern"], None)?;
        self.call_void(Method::POST, url, Some(patterns)).await
    }

    /// `DELETE /silent-pattern` with the patterns in the body.
    pub async fn delete_silent_patterns(&self, patterns: &SilentPatternList) -> Result<()> {
        let url = self.url(&["silent-pattern"], None)?;
        self.call_void(Method::DELETE, url, Some(patterns)).await
    }

    // Tags

    /// `GET /tag`
    pub async fn get_tag_list(&self) -> Result<TagList> {
        self.get(self.url(&["tag"], None)?).await
    }

    /// `GET /tag/stats`
    pub async fn get_tag_stats(&self) -> Result<TagStatList> {
        self.get(self.url(&["tag", "stats"], None)?).await
    }

    /// `DELETE /tag/{tag}`
    pub async fn delete_tag(&self, tag: &str) -> Result<()> {
        let url = self.url(&["tag", tag], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    // Triggers

    /// `GET /trigger/page`
    ///
    /// `page` is zero-based. An empty `tags` slice and a blank name are left
    /// out of the query.
    pub async fn get_trigger_list(
        &self,
        page: u64,
        only_problems: bool,
        tags: &[String],
        trigger_name: Option<&str>,
    ) -> Result<TriggerList> {
        let query = Query::new()
            .param("p", page)
            .param("size", TRIGGER_LIST_PAGE_SIZE)
            .list("tags", tags)
            .opt_param("triggerName", trigger_name.filter(|n| !n.trim().is_empty()))
            .param("onlyProblems", only_problems);
        self.get(self.url(&["trigger", "page"], Some(&query.encode()))?).await
    }

    /// `GET /trigger/{id}`
    pub async fn get_trigger(&self, id: &str) -> Result<Trigger> {
        self.get(self.url(&["trigger", id], None)?).await
    }

    /// `PUT /trigger`
    pub async fn add_trigger(&self, trigger: &Trigger) -> Result<SaveTriggerResponse> {
        self.call(Method::PUT, self.url(&["trigger"], None)?, trigger).await
    }

    /// `PUT /trigger/{id}`
    pub async fn set_trigger(&self, id: &str, trigger: &Trigger) -> Result<SaveTriggerResponse> {
        self.call(Method::PUT, self.url(&["trigger", id], None)?, trigger).await
    }

    /// `DELETE /trigger/{id}`
    pub async fn delete_trigger(&self, id: &str) -> Result<()> {
        let url = self.url(&["trigger", id], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `PUT /trigger/{id}/maintenance`
    ///
    /// Maps metric names to the Unix time their maintenance ends; `0`
    /// lifts it.
    pub async fn set_maintenance(&self, trigger_id: &str, metrics: &BTreeMap<String, i64>) -> Result<()> {
        let url = self.url(&["trigger", trigger_id, "maintenance"], None)?;
        self.call_void(Method::PUT, url, Some(metrics)).await
    }

    /// `PUT /trigger/{id}/triggerMaintenance`
    pub async fn set_trigger_maintenance(&self, trigger_id: &str, until: i64) -> Result<()> {
        let url = self.url(&["trigger", trigger_id, "triggerMaintenance"], None)?;
        self.call_void(Method::PUT, url, Some(&serde_json::json!({ "until": until })))
            .await
    }

    /// `GET /trigger/{id}/state`
    pub async fn get_trigger_state(&self, id: &str) -> Result<TriggerState> {
        self.get(self.url(&["trigger", id, "state"], None)?).await
    }

    /// `GET /event/{id}` for the zero-based `page`.
    pub async fn get_trigger_events(&self, id: &str, page: u64) -> Result<EventList> {
        let query = Query::new()
            .param("p", page)
            .param("size", EVENT_HISTORY_PAGE_SIZE);
        self.get(self.url(&["event", id], Some(&query.encode()))?).await
    }

    /// `DELETE /trigger/{id}/throttling`
    pub async fn delete_throttling(&self, trigger_id: &str) -> Result<()> {
        let url = self.url(&["trigger", trigger_id, "throttling"], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `DELETE /trigger/{id}/escalations`
    pub async fn ack_escalations(&self, trigger_id: &str) -> Result<()> {
        let url = self.url(&["trigger", trigger_id, "escalations"], None)?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `DELETE /trigger/{id}/metrics?name=`
    pub async fn delete_metric(&self, trigger_id: &str, metric: &str) -> Result<()> {
        let query = Query::new().param("name", metric);
        let url = self.url(&["trigger", trigger_id, "metrics"], Some(&query.encode()))?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    // Notifications and statistics

    /// `GET /notification?start=0&end=-1`
    pub async fn get_notification_list(&self) -> Result<NotificationList> {
        self.get(self.url(&["notification"], Some(ALL_NOTIFICATIONS))?).await
    }

    /// `DELETE /notification?id=`
    pub async fn delete_notification(&self, id: &str) -> Result<()> {
        let query = Query::new().param("id", id);
        let url = self.url(&["notification"], Some(&query.encode()))?;
        self.call_void::<()>(Method::DELETE, url, None).await
    }

    /// `GET /stats/metrics`
    pub async fn get_metric_stats(&self, interval_length: u64, only_problems: bool, tags: &[String]) -> Result<MetricStats> {
        let query = Query::new()
            .param("intervalLength", interval_length)
            .list("tags", tags)
            .param("onlyProblems", only_problems);
        self.get(self.url(&["stats", "metrics"], Some(&query.encode()))?).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
