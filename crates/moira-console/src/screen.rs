//! Per-screen load state.
//!
//! A screen starts in [`ScreenStatus::Loading`], moves to `Loaded` when a
//! fetch succeeds and to `Error` when one fails. Any refetch goes back to
//! `Loading`. Each fetch is tagged with a [`FetchTicket`]; only the result of
//! the most recent ticket is committed, so a slow response cannot overwrite
//! the state produced by a newer one.

use std::fmt;

use crate::error::{ConsoleError, Result};

/// Status of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenStatus {
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch or action failed with this message.
    Error(String),
}

/// Identifies one fetch issued by [`Screen::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket(u64);

/// Outcome of [`Screen::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The result was committed to the screen.
    Committed,
    /// A newer fetch was issued; the result was dropped.
    Stale,
}

/// Load state and data of one screen.
#[derive(Debug, Clone)]
pub struct Screen<T> {
    status: ScreenStatus,
    data: Option<T>,
    generation: u64,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Screen<T> {
    /// A freshly mounted screen: loading, with no data.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: ScreenStatus::Loading,
            data: None,
            generation: 0,
        }
    }

    /// Starts a fetch and returns its ticket.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = ScreenStatus::Loading;
        FetchTicket(self.generation)
    }

    /// True when `ticket` belongs to the most recent fetch.
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Commits the result of the fetch identified by `ticket`.
    ///
    /// An error keeps the last good data and stores the message verbatim.
    pub fn settle<E: fmt::Display>(&mut self, ticket: FetchTicket, result: std::result::Result<T, E>) -> Settled {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.generation, "dropping stale fetch result");
            return Settled::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = ScreenStatus::Loaded;
            }
            Err(e) => self.status = ScreenStatus::Error(e.to_string()),
        }
        Settled::Committed
    }

    /// Like [`Screen::settle`] for console results, but hands a current
    /// error back to the caller after recording it. A stale error is
    /// dropped along with its fetch.
    pub fn commit(&mut self, ticket: FetchTicket, result: Result<T>) -> Result<Settled> {
        match result {
            Ok(data) => Ok(self.settle(ticket, Ok::<T, ConsoleError>(data))),
            Err(e) if self.is_current(ticket) => {
                self.fail(&e);
                Err(e)
            }
            Err(_) => Ok(Settled::Stale),
        }
    }

    /// Records a failed action without touching the data.
    pub fn fail(&mut self, message: impl fmt::Display) {
        self.status = ScreenStatus::Error(message.to_string());
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &ScreenStatus {
        &self.status
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, ScreenStatus::Loading)
    }

    /// Message of the last failure, if the screen is in the error state.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ScreenStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Last successfully loaded data.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Loaded data, or [`ConsoleError::InvalidProgramState`] if nothing has
    /// loaded yet.
    pub fn require(&self) -> Result<&T> {
        self.data
            .as_ref()
            .ok_or_else(|| ConsoleError::invalid_state("screen data is not loaded"))
    }

    /// Mutable loaded data; see [`Screen::require`].
    pub fn require_mut(&mut self) -> Result<&mut T> {
        self.data
            .as_mut()
            .ok_or_else(|| ConsoleError::invalid_state("screen data is not loaded"))
    }

    /// Applies a gateway result to the screen.
    ///
    /// `Ok` is passed through. `Err` moves the screen to the error state and
    /// is returned to the caller as well.
    pub fn track<R, E>(&mut self, result: std::result::Result<R, E>) -> Result<R>
    where
        E: Into<ConsoleError>,
    {
        result.map_err(|e| {
            let err = e.into();
            self.fail(&err);
            err
        })
    }
}
