//! Metric patterns referenced by triggers.

use moira_api::MoiraClient;
use moira_core::Pattern;

use crate::error::Result;
use crate::screen::Screen;

/// Controller of the pattern list.
#[derive(Debug)]
pub struct PatternsContainer {
    client: MoiraClient,
    screen: Screen<Vec<Pattern>>,
}

impl PatternsContainer {
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
    pub const fn screen(&self) -> &Screen<Vec<Pattern>> {
        &self.screen
    }

    /// Fetches all patterns, sorted by pattern text.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.screen.begin();
        let result = self.client.get_pattern_list().await.map(|patterns| {
            let mut list = patterns.list;
            list.sort_by(|a, b| a.pattern.cmp(&b.pattern));
            list
        });
        self.screen.commit(ticket, result.map_err(Into::into)).map(drop)
    }

    /// Deletes a pattern.
    pub async fn delete(&mut self, pattern: &str) -> Result<()> {
        let result = self.client.delete_pattern(pattern).await;
        self.screen.track(result)?;
        self.load().await
    }
}
