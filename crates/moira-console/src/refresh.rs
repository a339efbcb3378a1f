//! Fixed-period refresh timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Emits a tick every `period` seconds from a background task.
///
/// A period of `0` is inert: no task runs and [`AutoRefresh::tick`] never
/// resolves. Changing the period replaces the task; dropping the value stops
/// it. Ticks are not suppressed while a previous refetch is still running;
/// callers rely on [`Screen`](crate::screen::Screen) tickets to drop stale
/// results.
#[derive(Debug)]
pub struct AutoRefresh {
    period: u64,
    ticks: Option<mpsc::Receiver<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    /// Starts a timer. Must be called inside a Tokio runtime when `period`
    /// is non-zero.
    #[must_use]
    pub fn new(period_secs: u64) -> Self {
        let mut refresh = Self {
            period: 0,
            ticks: None,
            task: None,
        };
        refresh.set_period(period_secs);
        refresh
    }

    /// Current period in seconds.
    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// True when a timer task is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Changes the period, restarting the timer when it differs.
    pub fn set_period(&mut self, period_secs: u64) {
        if period_secs == self.period && (period_secs == 0 || self.task.is_some()) {
            return;
        }
        self.stop();
        self.period = period_secs;
        if period_secs == 0 {
            return;
        }

        let period = Duration::from_secs(period_secs);
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(period_secs, "auto refresh started");
        self.ticks = Some(rx);
        self.task = Some(task);
    }

    /// Waits for the next tick.
    pub async fn tick(&mut self) {
        match self.ticks.as_mut() {
            Some(rx) => {
                if rx.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.ticks = None;
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period() {
        let mut refresh = AutoRefresh::new(60);
        let start = Instant::now();
        refresh.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(60));
        refresh.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_inert() {
        let mut refresh = AutoRefresh::new(0);
        assert!(!refresh.is_active());
        let waited = tokio::time::timeout(Duration::from_secs(3600), refresh.tick()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn changing_period_restarts_timer() {
        let mut refresh = AutoRefresh::new(60);
        tokio::time::sleep(Duration::from_secs(50)).await;

        refresh.set_period(10);
        assert_eq!(refresh.period(), 10);
        let start = Instant::now();
        refresh.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));

        refresh.set_period(0);
        assert!(!refresh.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn same_period_keeps_timer() {
        let mut refresh = AutoRefresh::new(30);
        tokio::time::sleep(Duration::from_secs(20)).await;
        refresh.set_period(30);
        let start = Instant::now();
        refresh.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
