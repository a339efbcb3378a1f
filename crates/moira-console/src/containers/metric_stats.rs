//! Metric error statistics.
//!
//! The screen may refetch on a timer while a previous fetch is still in
//! flight. Fetches are therefore split into [`MetricStatsContainer::start_fetch`],
//! which hands out a detached future, and [`MetricStatsContainer::settle`],
//! which drops results of superseded fetches.

use std::future::Future;

use moira_api::MoiraClient;
use moira_core::{MetricColumn, MetricSort, MetricStat};

use crate::error::Result;
use crate::location::MetricStatsSearch;
use crate::screen::{FetchTicket, Screen, Settled};

/// Loaded statistics.
#[derive(Debug, Clone, Default)]
pub struct MetricStatsView {
    /// Known tags.
    pub tags: Vec<String>,
    /// Rows in server order; empty when no tag is selected.
    pub stats: Vec<MetricStat>,
}

/// Controller of the metric statistics screen.
#[derive(Debug)]
pub struct MetricStatsContainer {
    client: MoiraClient,
    search: MetricStatsSearch,
    sort: MetricSort,
    screen: Screen<MetricStatsView>,
}

impl MetricStatsContainer {
    /// Creates the controller.
    #[must_use]
    pub fn new(client: MoiraClient) -> Self {
        Self {
            client,
            search: MetricStatsSearch::default(),
            sort: MetricSort::default(),
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<MetricStatsView> {
        &self.screen
    }

    /// Search of the current location.
    #[must_use]
    pub const fn search(&self) -> &MetricStatsSearch {
        &self.search
    }

    /// Replaces the search; takes effect with the next fetch.
    pub fn set_search(&mut self, search: MetricStatsSearch) {
        self.search = search;
    }

    /// Current sort.
    #[must_use]
    pub const fn sort(&self) -> MetricSort {
        self.sort
    }

    /// Replaces the sort.
    pub fn set_sort(&mut self, sort: MetricSort) {
        self.sort = sort;
    }

    /// Selects a sort column: the active one flips, another resets to
    /// ascending.
    pub fn select_sort(&mut self, column: MetricColumn) -> MetricSort {
        self.sort.select(column);
        self.sort
    }

    /// Loaded rows in the current sort order.
    pub fn rows(&self) -> Result<Vec<MetricStat>> {
        let mut rows = self.screen.require()?.stats.clone();
        self.sort.apply(&mut rows);
        Ok(rows)
    }

    /// Starts a fetch for the current search.
    ///
    /// The returned future owns everything it needs, so it can be spawned.
    /// Hand its output to [`MetricStatsContainer::settle`] with the ticket.
    pub fn start_fetch(&mut self) -> (FetchTicket, impl Future<Output = Result<MetricStatsView>> + Send + 'static) {
        let ticket = self.screen.begin();
        let client = self.client.clone();
        let search = self.search.clone();
        (ticket, async move { fetch(&client, &search).await })
    }

    /// Commits a finished fetch unless a newer one was started.
    pub fn settle(&mut self, ticket: FetchTicket, result: Result<MetricStatsView>) -> Settled {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "metric stats fetch failed");
        }
        self.screen.settle(ticket, result)
    }

    /// Fetches and commits in one step.
    pub async fn load(&mut self) -> Result<()> {
        let (ticket, fetch) = self.start_fetch();
        let result = fetch.await;
        self.screen.commit(ticket, result).map(drop)
    }
}

async fn fetch(client: &MoiraClient, search: &MetricStatsSearch) -> Result<MetricStatsView> {
    let tags = client.get_tag_list().await?;
    if search.tags.is_empty() {
        return Ok(MetricStatsView {
            tags: tags.list,
            stats: Vec::new(),
        });
    }
    let selected = tags.intersect(&search.tags);
    let stats = client
        .get_metric_stats(search.interval_length, search.only_problems, &selected)
        .await?;
    Ok(MetricStatsView {
        tags: tags.list,
        stats: stats.list,
    })
}
