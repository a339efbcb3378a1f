//! Trigger list screen.

use std::collections::BTreeMap;

use moira_api::MoiraClient;
use moira_core::{is_special_tag, Maintenance, TriggerList, UiConfig};

use crate::error::Result;
use crate::filters::{FilterDefaults, FilterStore};
use crate::location::TriggerListSearch;
use crate::screen::Screen;

/// Tags offered by the tag filter, split into three groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBuckets {
    /// Requested tags that exist, in request order.
    pub selected: Vec<String>,
    /// Tags of the user's subscriptions that are not selected, special tags
    /// excluded.
    pub subscribed: Vec<String>,
    /// Every other known tag.
    pub remaining: Vec<String>,
}

impl TagBuckets {
    /// Splits `all_tags` by the request and the user's subscriptions.
    #[must_use]
    pub fn compute(all_tags: &[String], requested: &[String], subscribed_tags: &[String]) -> Self {
        let selected: Vec<String> = requested
            .iter()
            .filter(|t| all_tags.contains(t))
            .cloned()
            .collect();
        let subscribed_all: Vec<&String> = subscribed_tags
            .iter()
            .filter(|t| !selected.contains(t))
            .collect();
        let remaining = all_tags
            .iter()
            .filter(|t| !selected.contains(t) && !subscribed_all.contains(t))
            .cloned()
            .collect();
        let subscribed = subscribed_all
            .into_iter()
            .filter(|t| !is_special_tag(t))
            .cloned()
            .collect();
        Self {
            selected,
            subscribed,
            remaining,
        }
    }
}

/// Loaded trigger list.
#[derive(Debug, Clone)]
pub struct TriggerListView {
    /// Search the page was loaded for.
    pub search: TriggerListSearch,
    /// The page of triggers.
    pub triggers: TriggerList,
    /// Tag filter groups.
    pub tags: TagBuckets,
    /// UI configuration.
    pub config: UiConfig,
}

impl TriggerListView {
    /// Number of pages for the current filter.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.triggers.page_count()
    }
}

/// Result of [`TriggerListContainer::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerListLoad {
    /// The screen holds the requested page.
    Loaded,
    /// Navigate to this search instead; nothing was committed.
    Redirect(TriggerListSearch),
}

enum Fetched {
    View(TriggerListView),
    PageOutOfRange(u64),
}

/// Controller of the trigger list.
#[derive(Debug)]
pub struct TriggerListContainer {
    client: MoiraClient,
    store: Option<FilterStore>,
    search: TriggerListSearch,
    screen: Screen<TriggerListView>,
}

impl TriggerListContainer {
    /// Creates the controller. When `store` is set, every search change is
    /// written to it.
    #[must_use]
    pub fn new(client: MoiraClient, store: Option<FilterStore>) -> Self {
        Self {
            client,
            store,
            search: TriggerListSearch::default(),
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<TriggerListView> {
        &self.screen
    }

    /// Search of the current location.
    #[must_use]
    pub const fn search(&self) -> &TriggerListSearch {
        &self.search
    }

    /// Loads the page for `search`.
    ///
    /// Stored `defaults` fill filters the location leaves unset; in that case
    /// a redirect is returned before anything is fetched. A page past the end
    /// redirects to the last page.
    pub async fn load(&mut self, search: TriggerListSearch, defaults: &FilterDefaults) -> Result<TriggerListLoad> {
        if let Some(resolved) = search.with_defaults(defaults) {
            return Ok(TriggerListLoad::Redirect(self.change_search(|s| *s = resolved)));
        }
        self.search = search;
        self.refresh().await
    }

    /// Refetches the current search.
    pub async fn refresh(&mut self) -> Result<TriggerListLoad> {
        let ticket = self.screen.begin();
        let fetched = fetch(&self.client, &self.search).await;
        match fetched {
            Ok(Fetched::PageOutOfRange(last)) => {
                Ok(TriggerListLoad::Redirect(self.change_search(|s| s.page = last)))
            }
            Ok(Fetched::View(view)) => {
                self.screen.commit(ticket, Ok(view))?;
                Ok(TriggerListLoad::Loaded)
            }
            Err(e) => {
                self.screen.commit(ticket, Err(e))?;
                Ok(TriggerListLoad::Loaded)
            }
        }
    }

    /// Applies `update` to the current search, stores it and returns the
    /// location to navigate to.
    pub fn change_search(&self, update: impl FnOnce(&mut TriggerListSearch)) -> TriggerListSearch {
        let mut next = self.search.clone();
        update(&mut next);
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&next) {
                tracing::warn!(path = %store.path().display(), error = %e, "failed to store trigger filters");
            }
        }
        next
    }

    /// Adds a tag to the filter.
    pub fn select_tag(&self, tag: &str) -> TriggerListSearch {
        let selected = self.selected_tags();
        self.change_search(|s| {
            s.tags = selected;
            if !s.tags.iter().any(|t| t == tag) {
                s.tags.push(tag.to_string());
            }
        })
    }

    /// Removes a tag from the filter.
    pub fn remove_tag(&self, tag: &str) -> TriggerListSearch {
        let selected = self.selected_tags();
        self.change_search(|s| s.tags = selected.into_iter().filter(|t| t != tag).collect())
    }

    fn selected_tags(&self) -> Vec<String> {
        self.screen
            .data()
            .map_or_else(|| self.search.tags.clone(), |view| view.tags.selected.clone())
    }

    /// Sets a maintenance window on one metric, then refetches.
    pub async fn set_metric_maintenance(
        &mut self,
        trigger_id: &str,
        metric: &str,
        maintenance: Maintenance,
        now: i64,
    ) -> Result<()> {
        let ticket = self.screen.begin();
        let metrics = BTreeMap::from([(metric.to_string(), maintenance.until(now))]);
        let result = self.client.set_maintenance(trigger_id, &metrics).await;
        if let Err(e) = result {
            self.screen.commit(ticket, Err(e.into()))?;
        }
        self.refresh().await.map(drop)
    }

    /// Removes a metric from a trigger, then refetches.
    pub async fn remove_metric(&mut self, trigger_id: &str, metric: &str) -> Result<()> {
        let ticket = self.screen.begin();
        if let Err(e) = self.client.delete_metric(trigger_id, metric).await {
            self.screen.commit(ticket, Err(e.into()))?;
        }
        self.refresh().await.map(drop)
    }
}

async fn fetch(client: &MoiraClient, search: &TriggerListSearch) -> Result<Fetched> {
    let settings = client.get_settings().await?;
    let all_tags = client.get_tag_list().await?;
    let config = client.get_config().await?;
    let selected = all_tags.intersect(&search.tags);
    let triggers = client
        .get_trigger_list(
            search.page_index(),
            search.only_problems,
            &selected,
            Some(search.trigger_name.as_str()),
        )
        .await?;

    if triggers.total != 0 && search.page > triggers.page_count() {
        return Ok(Fetched::PageOutOfRange(triggers.page_count()));
    }

    let tags = TagBuckets::compute(&all_tags.list, &search.tags, &settings.subscribed_tags());
    Ok(Fetched::View(TriggerListView {
        search: search.clone(),
        triggers,
        tags,
        config,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn buckets_split_known_tags() {
        let all = strings(&["prod", "db", "web", "DEGRADATION", "ERROR", "team"]);
        let buckets = TagBuckets::compute(
            &all,
            &strings(&["web", "unknown"]),
            &strings(&["db", "web", "DEGRADATION"]),
        );
        assert_eq!(buckets.selected, strings(&["web"]));
        assert_eq!(buckets.subscribed, strings(&["db"]));
        assert_eq!(buckets.remaining, strings(&["prod", "ERROR", "team"]));
    }

    #[test]
    fn buckets_without_subscriptions() {
        let all = strings(&["a", "b"]);
        let buckets = TagBuckets::compute(&all, &[], &[]);
        assert!(buckets.selected.is_empty());
        assert!(buckets.subscribed.is_empty());
        assert_eq!(buckets.remaining, all);
    }
}
