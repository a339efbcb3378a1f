//! Silent patterns and silent tags.

use moira_api::MoiraClient;
use moira_core::{SilentPattern, SilentPatternList, SilentPatternType, SilentSort, SilentSortKey, TimeOffset};

use crate::error::{ConsoleError, Result};
use crate::screen::Screen;

/// Loaded silent-pattern list.
#[derive(Debug, Clone, Default)]
pub struct SilentView {
    /// Patterns of the screen's type.
    pub patterns: Vec<SilentPattern>,
    /// Known tags; only fetched for silent tags.
    pub tags: Vec<String>,
}

/// Controller of one silent-pattern screen.
#[derive(Debug)]
pub struct SilentPatternsContainer {
    client: MoiraClient,
    kind: SilentPatternType,
    search: String,
    sort: SilentSort,
    screen: Screen<SilentView>,
}

impl SilentPatternsContainer {
    /// Creates the controller for patterns of `kind`.
    #[must_use]
    pub fn new(client: MoiraClient, kind: SilentPatternType) -> Self {
        Self {
            client,
            kind,
            search: String::new(),
            sort: SilentSort::default(),
            screen: Screen::new(),
        }
    }

    /// Screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen<SilentView> {
        &self.screen
    }

    /// Current sort.
    #[must_use]
    pub const fn sort(&self) -> SilentSort {
        self.sort
    }

    /// Replaces the sort, e.g. from the location fragment.
    pub fn set_sort(&mut self, sort: SilentSort) {
        self.sort = sort;
    }

    /// Selects a sort column: the active one flips, another resets to
    /// ascending.
    pub fn select_sort(&mut self, key: SilentSortKey) -> SilentSort {
        self.sort.select(key);
        self.sort
    }

    /// Sets the search filter.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Patterns matching the search, in sort order.
    pub fn visible(&self) -> Result<Vec<&SilentPattern>> {
        let view = self.screen.require()?;
        Ok(self.sort.view(&view.patterns, &self.search))
    }

    /// Fetches the patterns, plus the tag list for silent tags.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.screen.begin();
        let result = async {
            let patterns = self.client.get_silent_pattern_list(self.kind).await?;
            let tags = match self.kind {
                SilentPatternType::Tag => self.client.get_tag_list().await?.list,
                SilentPatternType::Pattern => Vec::new(),
            };
            Ok::<_, ConsoleError>(SilentView {
                patterns: patterns.list,
                tags,
            })
        }
        .await;
        self.screen.commit(ticket, result).map(drop)
    }

    /// Creates patterns. Each is stamped with the screen's type.
    pub async fn create(&mut self, patterns: Vec<SilentPattern>) -> Result<()> {
        let list = SilentPatternList {
            list: patterns
                .into_iter()
                .map(|p| SilentPattern { kind: self.kind, ..p })
                .collect(),
        };
        let result = self.client.add_silent_patterns(&list).await;
        self.screen.track(result)?;
        self.load().await
    }

    /// Extends the selected patterns to `now + offset`.
    pub async fn prolong(&mut self, ids: &[String], offset: TimeOffset, now: i64) -> Result<()> {
        let until = offset.until(now);
        let list = SilentPatternList {
            list: self
                .selected(ids)?
                .into_iter()
                .map(|p| SilentPattern { until, ..p })
                .collect(),
        };
        let result = self.client.update_silent_patterns(&list).await;
        self.screen.track(result)?;
        self.load().await
    }

    /// Deletes the selected patterns.
    pub async fn delete(&mut self, ids: &[String]) -> Result<()> {
        let list = SilentPatternList {
            list: self.selected(ids)?,
        };
        let result = self.client.delete_silent_patterns(&list).await;
        self.screen.track(result)?;
        self.load().await
    }

    fn selected(&self, ids: &[String]) -> Result<Vec<SilentPattern>> {
        let view = self.screen.require()?;
        let picked: Vec<SilentPattern> = view
            .patterns
            .iter()
            .filter(|p| ids.iter().any(|id| id == p.key()))
            .cloned()
            .collect();
        if picked.len() != ids.len() {
            return Err(ConsoleError::NotFound(ids.join(", ")));
        }
        Ok(picked)
    }
}
