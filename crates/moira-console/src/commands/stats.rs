//! Metric statistics command implementation.
//!
//! With `--watch` the table is refetched on a fixed period. A refetch is
//! started on every tick even if the previous one has not finished; results
//! of superseded fetches are dropped.

use std::io::Write;

use moira_api::MoiraClient;
use moira_core::MetricSort;
use tokio::task::JoinSet;

use crate::cli::StatsArgs;
use crate::containers::{MetricStatsContainer, MetricStatsView};
use crate::error::Result;
use crate::location::MetricStatsSearch;
use crate::output::{OutputFormat, StatsTable};
use crate::refresh::AutoRefresh;
use crate::screen::{FetchTicket, Settled};

/// Handler for `moira stats`.
pub struct StatsCommand<'a> {
    client: &'a MoiraClient,
}

impl<'a> StatsCommand<'a> {
    /// Creates a new statistics handler.
    #[must_use]
    pub const fn new(client: &'a MoiraClient) -> Self {
        Self { client }
    }

    /// Prints statistics once, or keeps printing them with `--watch` until
    /// interrupted.
    ///
    /// # Errors
    ///
    /// Returns error if the first fetch fails.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat, args: &StatsArgs) -> Result<()> {
        let mut container = MetricStatsContainer::new(self.client.clone());
        container.set_search(MetricStatsSearch {
            tags: args.tags.clone(),
            only_problems: args.only_problems,
            interval_length: args.interval,
            auto_refresh_period: args.refresh,
        });
        container.set_sort(MetricSort::new(args.sort.into(), args.order.into()));

        container.load().await?;
        write_rows(out, format, &container)?;
        if !args.watch {
            return Ok(());
        }

        let mut refresh = AutoRefresh::new(container.search().auto_refresh_period);
        let mut inflight: JoinSet<(FetchTicket, Result<MetricStatsView>)> = JoinSet::new();
        loop {
            tokio::select! {
                () = refresh.tick() => {
                    let (ticket, fetch) = container.start_fetch();
                    inflight.spawn(async move { (ticket, fetch.await) });
                }
                Some(joined) = inflight.join_next() => {
                    match joined {
                        Ok((ticket, result)) => {
                            if container.settle(ticket, result) == Settled::Committed
                                && container.screen().error().is_none()
                            {
                                write_rows(out, format, &container)?;
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "metric stats fetch task failed"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::debug!("watch interrupted");
                    inflight.abort_all();
                    return Ok(());
                }
            }
        }
    }
}

fn write_rows<W: Write>(out: &mut W, format: &OutputFormat, container: &MetricStatsContainer) -> Result<()> {
    let table = StatsTable {
        stats: container.rows()?,
    };
    format.write(out, &table)?;
    out.flush()?;
    Ok(())
}
